//! Keyed collections of memories.

use std::collections::{btree_map, BTreeMap};

use log::debug;

use crate::{
    expr::{Expr, Width},
    interval::IntervalMap,
    memory::{requested, Addr, Memory, MemoryConfig, SparseMemory},
};

/// Independent memories addressed by name.
///
/// Architectures with several address spaces (e.g. `"mem"` and `"io"`), or
/// analyses which keep separate stacks, use one memory per key. A store to an
/// unknown key creates a [`SparseMemory`] for it; every other operation
/// treats an unknown key as an empty memory.
///
/// # Example
///
/// ```rust
/// use symmem::prelude::*;
///
/// let mut spaces = AddressSpaces::new();
/// spaces.store("stack", 0x7ff0, Expr::from_u64(1, Width::W64), Width::W64);
///
/// assert!(spaces.load("stack", 0x7ff0, Width::W64).is_some());
/// assert!(spaces.load("heap", 0x7ff0, Width::W64).is_none());
/// assert_eq!(spaces.keys().collect::<Vec<_>>(), ["stack"]);
/// ```
#[derive(Debug, Default)]
pub struct AddressSpaces {
    spaces: BTreeMap<String, Box<dyn Memory>>,
    config: MemoryConfig,
}

impl AddressSpaces {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection whose lazily created memories use
    /// `config`.
    #[must_use]
    pub fn with_config(config: MemoryConfig) -> Self {
        AddressSpaces {
            spaces: BTreeMap::new(),
            config,
        }
    }

    /// Loads `width` bytes at `addr` from the memory named `key`.
    ///
    /// Returns `None` for an unknown key.
    #[must_use]
    pub fn load(&self, key: &str, addr: Addr, width: Width) -> Option<Expr> {
        self.spaces.get(key)?.load(addr, width)
    }

    /// Stores `value` at `addr` in the memory named `key`, creating a sparse
    /// memory if the key is unknown.
    pub fn store(&mut self, key: &str, addr: Addr, value: Expr, width: Width) {
        let memory = match self.spaces.entry(key.to_owned()) {
            btree_map::Entry::Occupied(entry) => entry.into_mut(),
            btree_map::Entry::Vacant(entry) => {
                debug!("creating sparse memory for address space {key:?}");
                entry.insert(Box::new(SparseMemory::with_config(self.config)))
            }
        };
        memory.store(addr, value, width);
    }

    /// Returns the parts of `[addr, addr + width)` without data in the memory
    /// named `key`; the whole range for an unknown key.
    #[must_use]
    pub fn missing(&self, key: &str, addr: Addr, width: Width) -> IntervalMap<Addr> {
        match self.spaces.get(key) {
            Some(memory) => memory.missing(addr, width),
            None => requested(addr, width),
        }
    }

    /// Returns the ranges holding data in the memory named `key`; empty for
    /// an unknown key.
    #[must_use]
    pub fn blocks(&self, key: &str) -> IntervalMap<Addr> {
        self.spaces
            .get(key)
            .map(|memory| memory.blocks())
            .unwrap_or_default()
    }

    /// Sets the memory for `key`, returning the one it replaces.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        memory: impl Memory + 'static,
    ) -> Option<Box<dyn Memory>> {
        self.spaces.insert(key.into(), Box::new(memory))
    }

    /// Returns the memory for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&dyn Memory> {
        self.spaces.get(key).map(AsRef::as_ref)
    }

    /// Returns the memory for `key` for modification.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut (dyn Memory + 'static)> {
        self.spaces.get_mut(key).map(AsMut::as_mut)
    }

    /// Removes and returns the memory for `key`.
    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Memory>> {
        self.spaces.remove(key)
    }

    /// Returns the known keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.spaces.keys().map(String::as_str)
    }

    /// Returns the number of known keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// Returns `true` if no key is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}
