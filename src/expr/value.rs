//! Concrete values.
//!
//! [`Const`] is a fixed-width unsigned integer stored as little-endian bytes.
//! Values of any width are supported, so a whole loaded block of a program
//! image can be represented as a single constant.

use std::fmt;

use crate::expr::{BinaryOp, UnaryOp, Width};

/// A concrete value of a fixed width.
///
/// The byte image is little-endian and always exactly [`width`](Self::width)
/// bytes long.
///
/// # Example
///
/// ```rust
/// use symmem::expr::{Const, Width};
///
/// let c = Const::from_u64(0x1122_3344, Width::W32);
/// assert_eq!(c.bytes(), &[0x44, 0x33, 0x22, 0x11]);
/// assert_eq!(c.resize(Width::W16).to_u64(), Some(0x3344));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Const {
    bytes: Vec<u8>,
}

impl Const {
    /// Creates a constant of width `width` from little-endian `bytes`.
    ///
    /// Missing high bytes are zero; bytes beyond `width` are dropped.
    #[must_use]
    pub fn new(bytes: &[u8], width: Width) -> Self {
        let mut owned = bytes[..bytes.len().min(width.as_usize())].to_vec();
        owned.resize(width.as_usize(), 0);
        Const { bytes: owned }
    }

    /// Creates a constant taking ownership of `bytes`; the width is the
    /// number of bytes.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Const { bytes }
    }

    /// Creates a constant of width `width` holding `value`.
    #[must_use]
    pub fn from_u64(value: u64, width: Width) -> Self {
        Const::new(&value.to_le_bytes(), width)
    }

    /// Creates the zero constant of width `width`.
    #[must_use]
    pub fn zero(width: Width) -> Self {
        Const {
            bytes: vec![0; width.as_usize()],
        }
    }

    /// Returns the little-endian byte image.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the constant and returns its byte image.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the width of the constant.
    #[must_use]
    pub fn width(&self) -> Width {
        #[allow(clippy::cast_possible_truncation)] // Constants never exceed u32::MAX bytes
        Width::new(self.bytes.len() as u32)
    }

    /// Returns `true` if every bit is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Returns the value as `u64`, or `None` if it does not fit.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        if self.bytes.iter().skip(8).any(|&b| b != 0) {
            return None;
        }

        let mut buf = [0u8; 8];
        let n = self.bytes.len().min(8);
        buf[..n].copy_from_slice(&self.bytes[..n]);
        Some(u64::from_le_bytes(buf))
    }

    /// Returns the same value zero-extended or truncated to `width`.
    #[must_use]
    pub fn resize(&self, width: Width) -> Self {
        if self.width() == width {
            return self.clone();
        }
        Const::new(&self.bytes, width)
    }

    /// Applies `op` to this value at width `width`.
    #[must_use]
    pub fn unary(&self, op: UnaryOp, width: Width) -> Self {
        let mut v = self.resize(width);
        match op {
            UnaryOp::Not => v.bytes.iter_mut().for_each(|b| *b = !*b),
            UnaryOp::Neg => {
                v.bytes.iter_mut().for_each(|b| *b = !*b);
                v = v.binary(BinaryOp::Add, &Const::from_u64(1, width), width);
            }
        }
        v
    }

    /// Applies `op` to `self` and `rhs` at width `width`.
    ///
    /// For shifts, `rhs` is the shift amount in bits and is read at its own
    /// width. Shifting by the full width or more yields zero.
    #[must_use]
    pub fn binary(&self, op: BinaryOp, rhs: &Const, width: Width) -> Self {
        let lhs = self.resize(width);

        if op.is_shift() {
            let amount = rhs.to_u64().unwrap_or(u64::MAX);
            return match op {
                BinaryOp::Shl => shift_left(&lhs.bytes, amount),
                _ => shift_right(&lhs.bytes, amount),
            };
        }

        let rhs = rhs.resize(width);
        let bytes = match op {
            BinaryOp::And => zip_bytes(&lhs.bytes, &rhs.bytes, |a, b| a & b),
            BinaryOp::Or => zip_bytes(&lhs.bytes, &rhs.bytes, |a, b| a | b),
            BinaryOp::Xor => zip_bytes(&lhs.bytes, &rhs.bytes, |a, b| a ^ b),
            BinaryOp::Add => add_bytes(&lhs.bytes, &rhs.bytes, false),
            BinaryOp::Sub => {
                let inverted: Vec<u8> = rhs.bytes.iter().map(|b| !b).collect();
                add_bytes(&lhs.bytes, &inverted, true)
            }
            BinaryOp::Shl | BinaryOp::Shr => unreachable!("shifts are handled above"),
        };

        Const { bytes }
    }
}

fn zip_bytes(a: &[u8], b: &[u8], f: impl Fn(u8, u8) -> u8) -> Vec<u8> {
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

fn add_bytes(a: &[u8], b: &[u8], carry_in: bool) -> Vec<u8> {
    let mut carry = u16::from(carry_in);
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let sum = u16::from(x) + u16::from(y) + carry;
            carry = sum >> 8;
            sum.to_le_bytes()[0]
        })
        .collect()
}

fn shift_left(bytes: &[u8], bits: u64) -> Const {
    let len = bytes.len();
    let mut out = vec![0u8; len];
    if bits >= len as u64 * 8 {
        return Const { bytes: out };
    }

    #[allow(clippy::cast_possible_truncation)] // Bounded by the value width
    let (byte_shift, bit_shift) = ((bits / 8) as usize, (bits % 8) as u32);
    for i in byte_shift..len {
        let src = i - byte_shift;
        let mut b = bytes[src] << bit_shift;
        if bit_shift > 0 && src > 0 {
            b |= bytes[src - 1] >> (8 - bit_shift);
        }
        out[i] = b;
    }

    Const { bytes: out }
}

fn shift_right(bytes: &[u8], bits: u64) -> Const {
    let len = bytes.len();
    let mut out = vec![0u8; len];
    if bits >= len as u64 * 8 {
        return Const { bytes: out };
    }

    #[allow(clippy::cast_possible_truncation)] // Bounded by the value width
    let (byte_shift, bit_shift) = ((bits / 8) as usize, (bits % 8) as u32);
    for i in 0..len - byte_shift {
        let src = i + byte_shift;
        let mut b = bytes[src] >> bit_shift;
        if bit_shift > 0 && src + 1 < len {
            b |= bytes[src + 1] << (8 - bit_shift);
        }
        out[i] = b;
    }

    Const { bytes: out }
}

impl fmt::Debug for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Const({self})")
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        if self.bytes.is_empty() {
            write!(f, "0")?;
        }
        for b in self.bytes.iter().rev() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ":{}", self.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn c32(v: u64) -> Const {
        Const::from_u64(v, Width::W32)
    }

    #[test]
    fn test_new_extends_and_truncates() {
        assert_eq!(Const::new(&[1, 2], Width::W32).bytes(), &[1, 2, 0, 0]);
        assert_eq!(Const::new(&[1, 2, 3, 4], Width::W16).bytes(), &[1, 2]);
        assert_eq!(Const::zero(Width::W16).bytes(), &[0, 0]);
    }

    #[test]
    fn test_to_u64() {
        assert_eq!(c32(0xdead_beef).to_u64(), Some(0xdead_beef));
        let wide = Const::new(&[0, 0, 0, 0, 0, 0, 0, 0, 1], Width::new(9));
        assert_eq!(wide.to_u64(), None);
        let wide_small = Const::new(&[7], Width::new(16));
        assert_eq!(wide_small.to_u64(), Some(7));
    }

    #[test]
    fn test_bitwise_ops() {
        let a = c32(0xff00_ff00);
        let b = c32(0x0ff0_0ff0);
        assert_eq!(a.binary(BinaryOp::And, &b, Width::W32).to_u64(), Some(0x0f00_0f00));
        assert_eq!(a.binary(BinaryOp::Or, &b, Width::W32).to_u64(), Some(0xfff0_fff0));
        assert_eq!(a.binary(BinaryOp::Xor, &b, Width::W32).to_u64(), Some(0xf0f0_f0f0));
    }

    #[test]
    fn test_add_sub_wrap() {
        let max = c32(0xffff_ffff);
        let one = c32(1);
        assert_eq!(max.binary(BinaryOp::Add, &one, Width::W32).to_u64(), Some(0));
        assert_eq!(one.binary(BinaryOp::Sub, &c32(2), Width::W32).to_u64(), Some(0xffff_ffff));
        assert_eq!(c32(1000).binary(BinaryOp::Sub, &c32(1), Width::W32).to_u64(), Some(999));
    }

    #[test]
    fn test_shifts() {
        let v = Const::from_u64(0x0123_4567_89ab_cdef, Width::W64);
        let by = |bits| Const::from_u64(bits, Width::W8);

        assert_eq!(
            v.binary(BinaryOp::Shl, &by(12), Width::W64).to_u64(),
            Some(0x3456_789a_bcde_f000)
        );
        assert_eq!(
            v.binary(BinaryOp::Shr, &by(12), Width::W64).to_u64(),
            Some(0x0000_1234_5678_9abc)
        );
        assert_eq!(v.binary(BinaryOp::Shl, &by(64), Width::W64).to_u64(), Some(0));
        assert_eq!(v.binary(BinaryOp::Shr, &by(200), Width::W64).to_u64(), Some(0));
        assert_eq!(v.binary(BinaryOp::Shl, &by(0), Width::W64), v);
    }

    #[test]
    fn test_shift_amount_read_at_own_width() {
        // A 16-bit shift amount must not be truncated to an 8-bit operation.
        let v = Const::from_u64(0xff, Width::W8);
        let amount = Const::from_u64(0x100, Width::W16);
        assert!(v.binary(BinaryOp::Shl, &amount, Width::W8).is_zero());
    }

    #[test]
    fn test_unary_ops() {
        assert_eq!(c32(0).unary(UnaryOp::Not, Width::W32).to_u64(), Some(0xffff_ffff));
        assert_eq!(c32(1).unary(UnaryOp::Neg, Width::W32).to_u64(), Some(0xffff_ffff));
        assert_eq!(c32(0).unary(UnaryOp::Neg, Width::W32).to_u64(), Some(0));
    }

    #[test]
    fn test_every_op_keeps_width() {
        let a = c32(0x1234_5678);
        let b = Const::from_u64(3, Width::W8);
        for op in BinaryOp::iter() {
            assert_eq!(a.binary(op, &b, Width::W16).width(), Width::W16, "{op}");
        }
        for op in UnaryOp::iter() {
            assert_eq!(a.unary(op, Width::W64).width(), Width::W64, "{op}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Const::from_u64(0xbeef, Width::W32).to_string(), "0x0000beef:32");
    }
}
