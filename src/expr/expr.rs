//! Expression tree representation.
//!
//! This module defines [`Expr`], the value type stored in and loaded from
//! memories. An expression is either a concrete [`Const`], a named symbol, or
//! an operation over shared sub-expressions. Every node carries an explicit
//! [`Width`].

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

use crate::expr::{BinaryOp, Const, UnaryOp, Width};

/// A fixed-width value that may contain symbols.
///
/// Children are held behind [`Arc`] so that the memory layer can cut windows
/// out of a stored expression and rebuild new expressions around them without
/// copying the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A concrete value.
    Const(Const),

    /// A free symbol.
    Symbol {
        /// The symbol name.
        name: String,
        /// The symbol width.
        width: Width,
    },

    /// A unary operation.
    Unary {
        /// The operation to perform.
        op: UnaryOp,
        /// The operand.
        operand: Arc<Expr>,
        /// The result width.
        width: Width,
    },

    /// A binary operation.
    Binary {
        /// The operation to perform.
        op: BinaryOp,
        /// The left operand.
        lhs: Arc<Expr>,
        /// The right operand; the bit count for shifts.
        rhs: Arc<Expr>,
        /// The result width.
        width: Width,
    },

    /// Zero-extension or truncation of the operand.
    Resize {
        /// The operand.
        operand: Arc<Expr>,
        /// The result width.
        width: Width,
    },
}

impl Expr {
    /// Creates a constant expression.
    #[must_use]
    pub fn constant(value: Const) -> Self {
        Self::Const(value)
    }

    /// Creates a constant expression of width `width` holding `value`.
    #[must_use]
    pub fn from_u64(value: u64, width: Width) -> Self {
        Self::Const(Const::from_u64(value, width))
    }

    /// Creates a symbol expression.
    ///
    /// # Arguments
    ///
    /// * `name` - The symbol name (e.g., `"rax"`).
    /// * `width` - The symbol width.
    #[must_use]
    pub fn symbol(name: impl Into<String>, width: Width) -> Self {
        Self::Symbol {
            name: name.into(),
            width,
        }
    }

    /// Creates a unary operation expression.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: impl Into<Arc<Expr>>, width: Width) -> Self {
        Self::Unary {
            op,
            operand: operand.into(),
            width,
        }
    }

    /// Creates a binary operation expression.
    ///
    /// # Arguments
    ///
    /// * `op` - The binary operation.
    /// * `lhs` - The left operand.
    /// * `rhs` - The right operand; for shifts, the shift amount in bits.
    /// * `width` - The result width. Operands are zero-extended or truncated
    ///   to it.
    #[must_use]
    pub fn binary(
        op: BinaryOp,
        lhs: impl Into<Arc<Expr>>,
        rhs: impl Into<Arc<Expr>>,
        width: Width,
    ) -> Self {
        Self::Binary {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
            width,
        }
    }

    /// Zero-extends or truncates `operand` to `width`.
    ///
    /// Returns the operand itself when it already has the requested width, and
    /// a resized constant when the operand is constant.
    #[must_use]
    pub fn resize(operand: impl Into<Arc<Expr>>, width: Width) -> Self {
        let operand = operand.into();
        if operand.width() == width {
            return Arc::unwrap_or_clone(operand);
        }
        match operand.as_ref() {
            Self::Const(c) => Self::Const(c.resize(width)),
            _ => Self::Resize { operand, width },
        }
    }

    /// Returns the width of the expression.
    #[must_use]
    pub fn width(&self) -> Width {
        match self {
            Self::Const(c) => c.width(),
            Self::Symbol { width, .. }
            | Self::Unary { width, .. }
            | Self::Binary { width, .. }
            | Self::Resize { width, .. } => *width,
        }
    }

    /// Checks if this expression is a constant.
    #[must_use]
    pub const fn is_const(&self) -> bool {
        matches!(self, Self::Const(_))
    }

    /// Returns the constant value if this is a constant expression.
    #[must_use]
    pub const fn as_const(&self) -> Option<&Const> {
        match self {
            Self::Const(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the names of all symbols in this expression.
    #[must_use]
    pub fn symbols(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        self.collect_symbols(&mut names);
        names
    }

    fn collect_symbols(&self, names: &mut HashSet<String>) {
        match self {
            Self::Const(_) => {}
            Self::Symbol { name, .. } => {
                names.insert(name.clone());
            }
            Self::Unary { operand, .. } | Self::Resize { operand, .. } => {
                operand.collect_symbols(names);
            }
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(names);
                rhs.collect_symbols(names);
            }
        }
    }

    /// Evaluates the expression with named symbol bindings.
    ///
    /// A bound value is resized to the width of the symbol it replaces.
    ///
    /// # Returns
    ///
    /// `Some(Const)` of the expression's width, or `None` if any symbol is
    /// unbound.
    #[must_use]
    pub fn evaluate(&self, bindings: &HashMap<&str, Const>) -> Option<Const> {
        match self {
            Self::Const(c) => Some(c.clone()),
            Self::Symbol { name, width } => bindings.get(name.as_str()).map(|c| c.resize(*width)),
            Self::Unary { op, operand, width } => {
                Some(operand.evaluate(bindings)?.unary(*op, *width))
            }
            Self::Binary {
                op,
                lhs,
                rhs,
                width,
            } => {
                let l = lhs.evaluate(bindings)?;
                let r = rhs.evaluate(bindings)?;
                Some(l.binary(*op, &r, *width))
            }
            Self::Resize { operand, width } => Some(operand.evaluate(bindings)?.resize(*width)),
        }
    }

    /// Folds constant subexpressions.
    ///
    /// Besides evaluating operations over constants, a few identities are
    /// applied so that values composed by the memory layer collapse back to
    /// their parts:
    ///
    /// - `x | 0`, `x ^ 0`, `x + 0`, `x - 0`, `x << 0` and `x >> 0` become `x`
    /// - `x & 0` becomes `0`
    /// - shifts by at least the result width become `0`
    ///
    /// The result always has the same width as `self`.
    #[must_use]
    pub fn fold(&self) -> Self {
        match self {
            Self::Const(_) | Self::Symbol { .. } => self.clone(),
            Self::Unary { op, operand, width } => match operand.fold() {
                Self::Const(c) => Self::Const(c.unary(*op, *width)),
                folded => Self::unary(*op, folded, *width),
            },
            Self::Resize { operand, width } => Self::resize(operand.fold(), *width),
            Self::Binary {
                op,
                lhs,
                rhs,
                width,
            } => fold_binary(*op, lhs.fold(), rhs.fold(), *width),
        }
    }

    /// Returns the maximum nesting depth of operations in this expression.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Const(_) | Self::Symbol { .. } => 0,
            Self::Unary { operand, .. } | Self::Resize { operand, .. } => 1 + operand.depth(),
            Self::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
        }
    }
}

fn fold_binary(op: BinaryOp, lhs: Expr, rhs: Expr, width: Width) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(l), Expr::Const(r)) => return Expr::Const(l.binary(op, r, width)),
        (_, Expr::Const(r)) if op.is_shift() => {
            if r.is_zero() {
                return Expr::resize(lhs, width);
            }
            if r.to_u64().is_none_or(|bits| bits >= width.bits()) {
                return Expr::Const(Const::zero(width));
            }
        }
        (_, Expr::Const(r)) if r.is_zero() => match op {
            BinaryOp::Or | BinaryOp::Xor | BinaryOp::Add | BinaryOp::Sub => {
                return Expr::resize(lhs, width);
            }
            BinaryOp::And => return Expr::Const(Const::zero(width)),
            BinaryOp::Shl | BinaryOp::Shr => {}
        },
        (Expr::Const(l), _) if l.is_zero() && !op.is_shift() => match op {
            BinaryOp::Or | BinaryOp::Xor | BinaryOp::Add => return Expr::resize(rhs, width),
            BinaryOp::And => return Expr::Const(Const::zero(width)),
            _ => {}
        },
        (Expr::Const(l), _) if l.is_zero() => return Expr::Const(Const::zero(width)),
        _ => {}
    }

    Expr::binary(op, lhs, rhs, width)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(c) => write!(f, "{c}"),
            Self::Symbol { name, width } => write!(f, "{name}:{width}"),
            Self::Unary { op, operand, .. } => write!(f, "({op}{operand})"),
            Self::Binary { op, lhs, rhs, .. } => write!(f, "({lhs} {op} {rhs})"),
            Self::Resize { operand, width } => write!(f, "resize{width}({operand})"),
        }
    }
}

impl From<Const> for Expr {
    fn from(value: Const) -> Self {
        Self::Const(value)
    }
}
