//! Fixed-width symbolic values.
//!
//! Memories store and return [`Expr`] values. The memory layer only relies on
//! a small contract from them:
//!
//! - every value has a [`Width`] in bytes
//! - a concrete value exposes its little-endian byte image ([`Const::bytes`])
//! - values can be composed with [`BinaryOp::Or`] and [`BinaryOp::Shl`] and
//!   decomposed with [`BinaryOp::Shr`] and [`Expr::resize`]
//! - constant subexpressions can be folded ([`Expr::fold`])
//!
//! # Example
//!
//! ```rust
//! use symmem::expr::{BinaryOp, Expr, Width};
//!
//! let hi = Expr::from_u64(0xAB, Width::W8);
//! let lo = Expr::from_u64(0xCD, Width::W8);
//! let shifted = Expr::binary(BinaryOp::Shl, hi, Expr::from_u64(8, Width::W8), Width::W16);
//! let value = Expr::binary(BinaryOp::Or, lo, shifted, Width::W16);
//!
//! assert_eq!(value.fold(), Expr::from_u64(0xABCD, Width::W16));
//! ```

#[allow(clippy::module_inception)]
mod expr;
mod ops;
mod value;
mod width;

pub use expr::Expr;
pub use ops::{BinaryOp, UnaryOp};
pub use value::Const;
pub use width::Width;
