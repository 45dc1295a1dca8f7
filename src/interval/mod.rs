//! Interval algebra over ordered address types.
//!
//! This module provides the two primitives the memory layer is built on:
//!
//! - [`Interval`] - an immutable half-open range `[begin, end)`
//! - [`IntervalMap`] - a canonical set of disjoint, non-adjacent intervals with
//!   [`union`](IntervalMap::union), [`intersect`](IntervalMap::intersect) and
//!   [`complement`](IntervalMap::complement)
//!
//! Both are generic over the endpoint type; the memory layer instantiates them
//! with [`Addr`](crate::memory::Addr).
//!
//! # Laws
//!
//! For all maps `a` and `b`:
//!
//! - `a.union(&b) == b.union(&a)`
//! - `a.intersect(&b).union(&a.complement(&b)) == a`
//! - `IntervalMap::new(a.intervals().iter().copied()) == a`
//!
//! # Example
//!
//! ```rust
//! use symmem::interval::{Interval, IntervalMap};
//!
//! let requested = IntervalMap::from(Interval::new(0u64, 16));
//! let present = IntervalMap::new([Interval::new(0u64, 4), Interval::new(8, 12)]);
//!
//! let missing = requested.complement(&present);
//! assert_eq!(missing.intervals(), &[Interval::new(4, 8), Interval::new(12, 16)]);
//! ```

#[allow(clippy::module_inception)]
mod interval;
mod map;

pub use interval::Interval;
pub use map::IntervalMap;
