//! Sparse expression memory.
//!
//! [`SparseMemory`] holds only the ranges which were written. Every stored
//! value is kept whole; when a later store partially overwrites it, the
//! surviving parts stay behind as windows onto the original expression. Loads
//! reassemble values from as many stored pieces as the requested range spans.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::{
    expr::{Expr, Width},
    interval::{Interval, IntervalMap},
    memory::{compose, range_end, requested, width_of, window::Window, Addr, Memory, MemoryConfig},
};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    end: Addr,
    window: Window,
}

/// A sparse memory of symbolic values.
///
/// Entries are keyed by their first address and never overlap. A load
/// succeeds only when the stored entries cover the requested range without
/// gaps.
///
/// # Example
///
/// ```rust
/// use symmem::prelude::*;
///
/// let mut memory = SparseMemory::new();
/// memory.store(0x100, Expr::symbol("x", Width::W32), Width::W32);
/// memory.store(0x102, Expr::from_u64(0, Width::W8), Width::W8);
///
/// assert_eq!(memory.len(), 3);
/// assert!(memory.load(0x100, Width::W32).is_some());
/// assert!(memory.load(0x0FF, Width::W32).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SparseMemory {
    entries: BTreeMap<Addr, Entry>,
    config: MemoryConfig,
}

impl SparseMemory {
    /// Creates an empty sparse memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sparse memory with the given configuration.
    #[must_use]
    pub fn with_config(config: MemoryConfig) -> Self {
        SparseMemory {
            entries: BTreeMap::new(),
            config,
        }
    }

    /// Returns the number of stored entries.
    ///
    /// A store which splits an earlier entry leaves its remnants as separate
    /// entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Verifies that the entries are non-empty, sorted and disjoint and that
    /// every entry range matches the width of its window.
    ///
    /// # Panics
    ///
    /// Panics on the first violated invariant.
    pub fn check_invariants(&self) {
        let mut last_end = None;
        for (&begin, entry) in &self.entries {
            assert!(begin < entry.end, "empty entry at {begin:#x}");
            assert_eq!(
                entry.end - begin,
                u64::from(entry.window.width().bytes()),
                "entry [{begin:#x}, {:#x}) does not match its window",
                entry.end
            );
            if let Some(last_end) = last_end {
                assert!(
                    last_end <= begin,
                    "entry at {begin:#x} overlaps the previous entry ending at {last_end:#x}"
                );
            }
            last_end = Some(entry.end);
        }
    }

    /// Returns the entries overlapping `[begin, end)` in ascending order.
    fn overlapping(&self, begin: Addr, end: Addr) -> Vec<(Addr, &Entry)> {
        let mut found: Vec<_> = self
            .entries
            .range(..end)
            .rev()
            .take_while(|(_, entry)| entry.end > begin)
            .map(|(&addr, entry)| (addr, entry))
            .collect();
        found.reverse();
        found
    }
}

impl Memory for SparseMemory {
    fn load(&self, addr: Addr, width: Width) -> Option<Expr> {
        if width.is_zero() {
            return None;
        }

        let end = range_end(addr, width);
        let pieces = self.overlapping(addr, end);

        let mut covered = addr;
        for (begin, entry) in &pieces {
            if *begin > covered {
                break;
            }
            covered = entry.end;
        }
        if covered < end {
            trace!("sparse load [{addr:#x}, {end:#x}) not covered past {covered:#x}");
            return None;
        }

        trace!("sparse load [{addr:#x}, {end:#x}) from {} entries", pieces.len());
        compose(
            addr,
            width,
            pieces.into_iter().map(|(begin, entry)| {
                let mut window = entry.window.clone();
                let from = begin.max(addr);
                if begin < addr {
                    window = window.tail(width_of(entry.end - addr));
                }
                if entry.end > end {
                    window = window.head(width_of(end - from));
                }
                (from, window.expr())
            }),
        )
    }

    fn store(&mut self, addr: Addr, value: Expr, width: Width) {
        if width.is_zero() {
            trace!("sparse store of zero width at {addr:#x} ignored");
            return;
        }

        let end = range_end(addr, width);
        let overlapping: Vec<Addr> = self
            .overlapping(addr, end)
            .into_iter()
            .map(|(begin, _)| begin)
            .collect();

        trace!(
            "sparse store [{addr:#x}, {end:#x}) over {} entries",
            overlapping.len()
        );

        for begin in overlapping {
            let Some(entry) = self.entries.remove(&begin) else {
                continue;
            };

            if begin < addr {
                debug!("keeping [{begin:#x}, {addr:#x}) of entry at {begin:#x}");
                self.entries.insert(
                    begin,
                    Entry {
                        end: addr,
                        window: entry.window.head(width_of(addr - begin)),
                    },
                );
            }
            if end < entry.end {
                debug!("keeping [{end:#x}, {:#x}) of entry at {begin:#x}", entry.end);
                self.entries.insert(
                    end,
                    Entry {
                        end: entry.end,
                        window: entry.window.tail(width_of(entry.end - end)),
                    },
                );
            }
        }

        self.entries.insert(
            addr,
            Entry {
                end,
                window: Window::full(value, width),
            },
        );

        if self.config.check_invariants {
            self.check_invariants();
        }
    }

    fn missing(&self, addr: Addr, width: Width) -> IntervalMap<Addr> {
        let end = range_end(addr, width);
        let present = self
            .overlapping(addr, end)
            .into_iter()
            .map(|(begin, entry)| Interval::new(begin, entry.end))
            .collect::<IntervalMap<_>>();

        requested(addr, width).complement(&present)
    }

    fn blocks(&self) -> IntervalMap<Addr> {
        self.entries
            .iter()
            .map(|(&begin, entry)| Interval::new(begin, entry.end))
            .collect()
    }
}
