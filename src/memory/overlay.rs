//! Layered memory composition.
//!
//! An [`OverlayMemory`] puts a writable layer on top of a base memory. Stores
//! only ever reach the overlay; loads prefer the overlay and fall back to the
//! base byte by byte. A typical use is a [`BytesMemory`](crate::memory::BytesMemory)
//! program image as the base with a [`SparseMemory`](crate::memory::SparseMemory)
//! on top, so that symbolic writes never touch the image.
//!
//! Overlays nest: either layer may itself be an overlay. Every level adds a
//! `missing` query and a split of the request to each load, so deep stacks
//! should be flattened with [`squash`](crate::memory::squash).

use log::{trace, warn};

use crate::{
    expr::{Expr, Width},
    interval::IntervalMap,
    memory::{compose, requested, width_of, Addr, Memory, MemoryConfig},
};

/// A writable overlay on top of a base memory.
///
/// # Example
///
/// ```rust
/// use symmem::prelude::*;
///
/// let base = BytesMemory::new([(0u64, vec![0x11u8; 8])])?;
/// let mut memory = OverlayMemory::new(base, SparseMemory::new());
///
/// memory.store(2, Expr::symbol("x", Width::W16), Width::W16);
///
/// assert_eq!(memory.overlay().blocks().len(), 1);
/// assert!(memory.base().load(2, Width::W16).unwrap().is_const());
/// assert!(!memory.load(0, Width::W64).unwrap().fold().is_const());
/// # Ok::<(), symmem::Error>(())
/// ```
#[derive(Debug)]
pub struct OverlayMemory {
    base: Box<dyn Memory>,
    overlay: Box<dyn Memory>,
}

impl OverlayMemory {
    /// Creates an overlay of `overlay` on top of `base`.
    #[must_use]
    pub fn new(base: impl Memory + 'static, overlay: impl Memory + 'static) -> Self {
        Self::with_config(base, overlay, MemoryConfig::default())
    }

    /// Creates an overlay of `overlay` on top of `base` with the given
    /// configuration.
    ///
    /// Logs a warning if the resulting stack is deeper than
    /// [`MemoryConfig::overlay_depth_warning`].
    #[must_use]
    pub fn with_config(
        base: impl Memory + 'static,
        overlay: impl Memory + 'static,
        config: MemoryConfig,
    ) -> Self {
        let memory = Self::from_boxed(Box::new(base), Box::new(overlay));
        let depth = memory.depth();
        if depth > config.overlay_depth_warning {
            warn!(
                "overlay nested {depth} levels deep (warning threshold {}); consider squashing it",
                config.overlay_depth_warning
            );
        }
        memory
    }

    /// Creates an overlay from already boxed layers.
    #[must_use]
    pub fn from_boxed(base: Box<dyn Memory>, overlay: Box<dyn Memory>) -> Self {
        OverlayMemory { base, overlay }
    }

    /// Returns the base layer.
    #[must_use]
    pub fn base(&self) -> &dyn Memory {
        self.base.as_ref()
    }

    /// Returns the overlay layer.
    #[must_use]
    pub fn overlay(&self) -> &dyn Memory {
        self.overlay.as_ref()
    }

    /// Returns the base layer for modification.
    ///
    /// Stores through the overlay never reach the base; this is the only way
    /// to change it. The change is visible to the next load.
    pub fn base_mut(&mut self) -> &mut dyn Memory {
        self.base.as_mut()
    }

    /// Returns the overlay layer for modification.
    pub fn overlay_mut(&mut self) -> &mut dyn Memory {
        self.overlay.as_mut()
    }

    /// Splits the overlay into its base and overlay layers.
    #[must_use]
    pub fn into_parts(self) -> (Box<dyn Memory>, Box<dyn Memory>) {
        (self.base, self.overlay)
    }
}

impl Memory for OverlayMemory {
    fn load(&self, addr: Addr, width: Width) -> Option<Expr> {
        let from_base = self.overlay.missing(addr, width);
        if from_base.is_empty() {
            return self.overlay.load(addr, width);
        }

        let whole = requested(addr, width);
        if from_base == whole {
            return self.base.load(addr, width);
        }

        let from_overlay = whole.complement(&from_base);
        trace!(
            "overlay load at {addr:#x} split into {} base and {} overlay reads",
            from_base.len(),
            from_overlay.len()
        );

        let mut pieces = Vec::with_capacity(from_base.len() + from_overlay.len());
        for range in &from_base {
            let piece = self.base.load(range.begin(), width_of(range.len()))?;
            pieces.push((range.begin(), piece));
        }
        for range in &from_overlay {
            let piece = self.overlay.load(range.begin(), width_of(range.len()))?;
            pieces.push((range.begin(), piece));
        }
        pieces.sort_unstable_by_key(|(begin, _)| *begin);

        compose(addr, width, pieces)
    }

    fn store(&mut self, addr: Addr, value: Expr, width: Width) {
        self.overlay.store(addr, value, width);
    }

    fn missing(&self, addr: Addr, width: Width) -> IntervalMap<Addr> {
        self.base
            .missing(addr, width)
            .intersect(&self.overlay.missing(addr, width))
    }

    fn blocks(&self) -> IntervalMap<Addr> {
        self.base.blocks().union(&self.overlay.blocks())
    }

    fn depth(&self) -> usize {
        1 + self.base.depth().max(self.overlay.depth())
    }
}
