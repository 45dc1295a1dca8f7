//! Operation types.
//!
//! The operation set is the minimum the memory layer needs to compose and
//! decompose values (bitwise OR and logical shifts), plus the handful of
//! arithmetic and bitwise operations callers commonly store.

use std::fmt;

use strum::EnumIter;

/// A binary operation in an expression tree.
///
/// Both operands are interpreted as unsigned values of the operation width;
/// narrower operands are zero-extended and wider operands are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum BinaryOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Logical shift left by the right operand, in bits.
    Shl,
    /// Logical shift right by the right operand, in bits.
    Shr,
}

impl BinaryOp {
    /// Checks if this operation is commutative.
    #[must_use]
    pub const fn is_commutative(self) -> bool {
        matches!(self, Self::Add | Self::And | Self::Or | Self::Xor)
    }

    /// Checks if this operation is a shift.
    ///
    /// The right operand of a shift is a bit count, not a value of the
    /// operation width, and is never truncated.
    #[must_use]
    pub const fn is_shift(self) -> bool {
        matches!(self, Self::Shl | Self::Shr)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::And => write!(f, "&"),
            Self::Or => write!(f, "|"),
            Self::Xor => write!(f, "^"),
            Self::Shl => write!(f, "<<"),
            Self::Shr => write!(f, ">>"),
        }
    }
}

/// A unary operation in an expression tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum UnaryOp {
    /// Bitwise NOT.
    Not,
    /// Two's complement negation.
    Neg,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => write!(f, "~"),
            Self::Neg => write!(f, "-"),
        }
    }
}
