// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # symmem
//!
//! A layered symbolic memory model for binary analysis and emulation. Memories map a 64-bit
//! address space to fixed-width expressions which may be concrete byte values or contain
//! symbols, and can be stacked so that writes land in a scratch layer on top of a read-only
//! program image.
//!
//! ## Features
//!
//! - **Sparse symbolic memory** - Stores whole expressions and reassembles loads from partially
//!   overwritten values without splitting them into bytes
//! - **Byte images** - Contiguous blocks of concrete bytes with merge-on-touch semantics
//! - **Overlays** - Copy-on-write style composition of any two memories, nestable
//! - **Interval algebra** - Canonical interval sets with union, intersection and complement for
//!   reporting which ranges hold data
//!
//! ## Quick Start
//!
//! ```rust
//! use symmem::prelude::*;
//!
//! // A program image with a writable layer on top
//! let image = BytesMemory::new([(0x400000u64, vec![0x90u8; 0x100])])?;
//! let mut memory = OverlayMemory::new(image, SparseMemory::new());
//!
//! // Symbolic store, then a load spanning the image and the stored value
//! memory.store(0x400010, Expr::symbol("rax", Width::W64), Width::W64);
//! let value = memory.load(0x40000C, Width::W64).unwrap();
//! assert_eq!(value.width(), Width::W64);
//!
//! // Ranges without data are reported, never filled in
//! let missing = memory.missing(0x4000FC, Width::W64);
//! assert_eq!(missing.intervals(), &[Interval::new(0x400100, 0x400104)]);
//! # Ok::<(), symmem::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`interval`] - Half-open intervals and canonical interval maps
//! - [`expr`] - Fixed-width values: constants, symbols and operations over them
//! - [`memory`] - The [`memory::Memory`] trait and its implementations
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: `trace` for load and store routing, `debug` for
//! structural changes such as block merges and entry splits, and `warn` for overlay stacks
//! nested deeper than [`memory::MemoryConfig::overlay_depth_warning`].

pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use symmem::prelude::*;
///
/// let mut memory = SparseMemory::new();
/// memory.store(0, Expr::from_u64(7, Width::W8), Width::W8);
/// assert!(memory.missing(0, Width::W8).is_empty());
/// ```
pub mod prelude;

/// Fixed-width symbolic values.
///
/// [`expr::Expr`] is the value type of every memory. It covers concrete constants of any width,
/// named symbols, and unary, binary and resize operations over shared sub-expressions.
pub mod expr;

/// Half-open intervals and canonical interval maps.
pub mod interval;

/// Memories over a 64-bit address space.
///
/// See [`memory::Memory`] for the shared contract and [`memory::OverlayMemory`] for layering.
pub mod memory;

/// `symmem` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use symmem::{memory::BytesMemory, Result};
///
/// fn image(text: &[u8]) -> Result<BytesMemory> {
///     BytesMemory::new([(0x1000u64, text)])
/// }
/// # assert!(image(&[0xC3]).is_ok());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `symmem` Error type
///
/// The main error type for all fallible operations in this crate.
pub use error::Error;
