//! Memories over a 64-bit address space.
//!
//! All memories implement the [`Memory`] trait: they store expressions of a
//! given width at an address, load them back (possibly reassembled from
//! several stored values), and report which ranges hold data.
//!
//! # Implementations
//!
//! - [`SparseMemory`] - stores arbitrary expressions, splitting earlier
//!   stores when a later one partially overwrites them
//! - [`BytesMemory`] - contiguous blocks of concrete bytes, typically a
//!   program image
//! - [`OverlayMemory`] - a writable layer on top of a read-only view of
//!   another memory
//! - [`AddressSpaces`] - a keyed collection of independent memories
//!
//! # Contract
//!
//! - `load` returns `Some` only when every byte of the requested range is
//!   present; there is no partial result and no default fill
//! - a successful `load` of width `w` returns an expression of width `w`
//! - after `store(a, v, w)`, `load(a, w)` folds to `v` resized to `w`
//! - `missing(a, w)` and `blocks()` are canonical [`IntervalMap`]s
//!
//! # Example
//!
//! ```rust
//! use symmem::prelude::*;
//!
//! let image = BytesMemory::new([(0x1000u64, vec![0x11u8; 64])])?;
//! let mut memory = OverlayMemory::new(image, SparseMemory::new());
//!
//! memory.store(0x1004, Expr::from_u64(0xFF, Width::W8), Width::W8);
//!
//! let value = memory.load(0x1003, Width::W32).unwrap().fold();
//! assert_eq!(value, Expr::from_u64(0x1111_FF11, Width::W32));
//! assert!(memory.missing(0x1000, Width::new(64)).is_empty());
//! # Ok::<(), symmem::Error>(())
//! ```

use std::fmt;

use crate::{
    expr::{BinaryOp, Expr, Width},
    interval::{Interval, IntervalMap},
};

mod bytes;
mod config;
mod overlay;
mod sparse;
mod spaces;
mod squash;
mod window;

pub use bytes::{Block, ByteBlock, BytesMemory};
pub use config::MemoryConfig;
pub use overlay::OverlayMemory;
pub use sparse::SparseMemory;
pub use spaces::AddressSpaces;
pub use squash::squash;

/// A memory address.
pub type Addr = u64;

/// A byte-addressed store of fixed-width expressions.
pub trait Memory: fmt::Debug {
    /// Loads `width` bytes starting at `addr`.
    ///
    /// Returns `None` unless every byte of `[addr, addr + width)` is present.
    /// The returned expression has width `width` but is not folded.
    ///
    /// # Panics
    ///
    /// Panics if `addr + width` overflows the address space.
    fn load(&self, addr: Addr, width: Width) -> Option<Expr>;

    /// Stores `value` as `width` bytes starting at `addr`.
    ///
    /// The value is zero-extended or truncated to `width`.
    ///
    /// # Panics
    ///
    /// Panics if `addr + width` overflows the address space, or if the
    /// memory cannot hold `value` (see [`BytesMemory`]).
    fn store(&mut self, addr: Addr, value: Expr, width: Width);

    /// Returns the parts of `[addr, addr + width)` which hold no data.
    fn missing(&self, addr: Addr, width: Width) -> IntervalMap<Addr>;

    /// Returns every range which holds data.
    fn blocks(&self) -> IntervalMap<Addr>;

    /// Returns the number of layers a load may have to traverse.
    fn depth(&self) -> usize {
        1
    }
}

impl<M: Memory + ?Sized> Memory for Box<M> {
    fn load(&self, addr: Addr, width: Width) -> Option<Expr> {
        (**self).load(addr, width)
    }

    fn store(&mut self, addr: Addr, value: Expr, width: Width) {
        (**self).store(addr, value, width);
    }

    fn missing(&self, addr: Addr, width: Width) -> IntervalMap<Addr> {
        (**self).missing(addr, width)
    }

    fn blocks(&self) -> IntervalMap<Addr> {
        (**self).blocks()
    }

    fn depth(&self) -> usize {
        (**self).depth()
    }
}

/// Returns the end of the range `[addr, addr + width)`.
///
/// # Panics
///
/// Panics if the range runs past the end of the address space.
pub(crate) fn range_end(addr: Addr, width: Width) -> Addr {
    match addr.checked_add(u64::from(width.bytes())) {
        Some(end) => end,
        None => panic!("address range overflow: {addr:#x} + {} bytes", width.bytes()),
    }
}

/// Returns `[addr, addr + width)` as an interval map.
pub(crate) fn requested(addr: Addr, width: Width) -> IntervalMap<Addr> {
    IntervalMap::from(Interval::new(addr, range_end(addr, width)))
}

/// Returns the width of a range of `len` bytes.
///
/// # Panics
///
/// Panics if `len` does not fit a [`Width`]. Every range handled by a memory
/// is derived from a load or store width, so this cannot happen for ranges
/// clipped to a request.
pub(crate) fn width_of(len: Addr) -> Width {
    match u32::try_from(len) {
        Ok(bytes) => Width::new(bytes),
        Err(_) => panic!("range of {len} bytes exceeds the maximum width"),
    }
}

/// Composes a value of width `width` at `addr` from pieces read at their own
/// addresses.
///
/// Pieces must be sorted by address and must not overlap. A piece at `addr`
/// is used as is; every other piece is shifted left by its byte offset from
/// `addr` and the pieces are OR-ed together at `width`.
pub(crate) fn compose<I>(addr: Addr, width: Width, pieces: I) -> Option<Expr>
where
    I: IntoIterator<Item = (Addr, Expr)>,
{
    pieces.into_iter().fold(None, |acc, (begin, piece)| {
        let offset = begin - addr;
        let piece = if offset == 0 {
            piece
        } else {
            Expr::binary(
                BinaryOp::Shl,
                piece,
                Expr::from_u64(offset * 8, Width::W64),
                width,
            )
        };

        Some(match acc {
            None => piece,
            Some(acc) => Expr::binary(BinaryOp::Or, acc, piece, width),
        })
    })
}
