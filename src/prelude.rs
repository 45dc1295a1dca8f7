//! # symmem Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the symmem library. Import this module to get quick access to the memories, the
//! value types they store, and the [`Memory`] trait needed to call them.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all symmem operations
pub use crate::Error;

/// The result type used throughout symmem
pub use crate::Result;

// ================================================================================================
// Values
// ================================================================================================

/// Expression tree, constant values, widths and operations
pub use crate::expr::{BinaryOp, Const, Expr, UnaryOp, Width};

// ================================================================================================
// Intervals
// ================================================================================================

/// Half-open intervals and canonical interval sets
pub use crate::interval::{Interval, IntervalMap};

// ================================================================================================
// Memories
// ================================================================================================

/// The memory trait and address type
pub use crate::memory::{Addr, Memory};

/// Memory implementations
pub use crate::memory::{AddressSpaces, BytesMemory, OverlayMemory, SparseMemory};

/// Initial block input for byte memories
pub use crate::memory::{Block, ByteBlock};

/// Memory configuration and flattening
pub use crate::memory::{squash, MemoryConfig};
