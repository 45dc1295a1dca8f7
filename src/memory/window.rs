//! Byte windows onto stored expressions.

use std::sync::Arc;

use crate::expr::{BinaryOp, Expr, Width};

/// Bytes `[begin, end)` of a stored expression's little-endian image.
///
/// When a store partially overwrites an earlier one, the surviving parts of
/// the earlier value become narrower windows onto the same shared expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Window {
    value: Arc<Expr>,
    begin: Width,
    end: Width,
}

impl Window {
    /// Creates a window onto the first `width` bytes of `value`.
    pub(crate) fn full(value: impl Into<Arc<Expr>>, width: Width) -> Self {
        Window {
            value: value.into(),
            begin: Width::default(),
            end: width,
        }
    }

    pub(crate) fn width(&self) -> Width {
        self.end - self.begin
    }

    /// Keeps the first `len` bytes.
    ///
    /// # Panics
    ///
    /// Panics if the window is shorter than `len`.
    pub(crate) fn head(&self, len: Width) -> Self {
        assert!(
            len <= self.width(),
            "window is not long enough: {} < {}",
            self.width().bytes(),
            len.bytes()
        );
        Window {
            value: Arc::clone(&self.value),
            begin: self.begin,
            end: self.begin + len,
        }
    }

    /// Keeps the last `len` bytes.
    ///
    /// # Panics
    ///
    /// Panics if the window is shorter than `len`.
    pub(crate) fn tail(&self, len: Width) -> Self {
        assert!(
            len <= self.width(),
            "window is not long enough: {} < {}",
            self.width().bytes(),
            len.bytes()
        );
        Window {
            value: Arc::clone(&self.value),
            begin: self.end - len,
            end: self.end,
        }
    }

    /// Returns an expression of [`width`](Self::width) holding the windowed
    /// bytes.
    ///
    /// # Panics
    ///
    /// Panics if the window is empty.
    pub(crate) fn expr(&self) -> Expr {
        assert!(
            self.begin < self.end,
            "empty window: {} >= {}",
            self.begin.bytes(),
            self.end.bytes()
        );

        let value = if self.begin.is_zero() {
            Arc::clone(&self.value)
        } else {
            let shift = Expr::from_u64(self.begin.bits(), Width::W64);
            Arc::new(Expr::binary(
                BinaryOp::Shr,
                Arc::clone(&self.value),
                shift,
                self.value.width(),
            ))
        };

        Expr::resize(value, self.width())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn value() -> Expr {
        Expr::from_u64(0x0807_0605_0403_0201, Width::W64)
    }

    #[test]
    fn test_full_window() {
        let w = Window::full(value(), Width::W64);
        assert_eq!(w.width(), Width::W64);
        assert_eq!(w.expr(), value());
    }

    #[test]
    fn test_head_and_tail() {
        let w = Window::full(value(), Width::W64);
        assert_eq!(w.head(Width::W16).expr().fold(), Expr::from_u64(0x0201, Width::W16));
        assert_eq!(w.tail(Width::W16).expr().fold(), Expr::from_u64(0x0807, Width::W16));
        assert_eq!(
            w.tail(Width::new(5)).head(Width::W16).expr().fold(),
            Expr::from_u64(0x0504, Width::W16)
        );
    }

    #[test]
    fn test_windows_share_value() {
        let shared = Arc::new(Expr::symbol("x", Width::W32));
        let w = Window::full(Arc::clone(&shared), Width::W32);
        let tail = w.tail(Width::W8);
        assert!(Arc::ptr_eq(&tail.value, &shared));
    }

    #[test]
    fn test_symbolic_window() {
        let x = Expr::symbol("x", Width::W32);
        let w = Window::full(x.clone(), Width::W32).tail(Width::W16);
        let expected = Expr::resize(
            Expr::binary(BinaryOp::Shr, x, Expr::from_u64(16, Width::W64), Width::W32),
            Width::W16,
        );
        assert_eq!(w.expr(), expected);
    }

    #[test]
    fn test_window_wider_than_value() {
        let w = Window::full(Expr::from_u64(0xAB, Width::W8), Width::W32);
        assert_eq!(w.expr().fold(), Expr::from_u64(0xAB, Width::W32));
        assert_eq!(w.tail(Width::W16).expr().fold(), Expr::from_u64(0, Width::W16));
    }

    #[test]
    #[should_panic(expected = "window is not long enough")]
    fn test_head_too_long() {
        let _ = Window::full(value(), Width::W16).head(Width::W32);
    }

    #[test]
    #[should_panic(expected = "empty window")]
    fn test_empty_window_expr() {
        let _ = Window::full(value(), Width::W16).head(Width::default()).expr();
    }
}
