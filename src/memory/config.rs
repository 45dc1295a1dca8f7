//! Memory layer configuration.
//!
//! [`MemoryConfig`] controls the diagnostics of the memory layer. It never
//! changes the result of a load or store.
//!
//! # Presets
//!
//! - [`MemoryConfig::default()`] - invariant checks in debug builds, warn on
//!   overlays nested deeper than 4
//! - [`MemoryConfig::strict()`] - invariant checks always, warn from depth 3
//! - [`MemoryConfig::fast()`] - no checks, no warnings
//!
//! # Example
//!
//! ```rust
//! use symmem::memory::{MemoryConfig, SparseMemory};
//!
//! let config = MemoryConfig::new()
//!     .with_overlay_depth_warning(8)
//!     .with_check_invariants(true);
//!
//! let memory = SparseMemory::with_config(config);
//! assert!(memory.is_empty());
//! ```

/// Diagnostics configuration for memories.
///
/// # Default Configuration
///
/// - overlay nesting warning above depth 4
/// - invariant checks enabled only with `debug_assertions`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Overlay nesting depth above which a warning is logged.
    ///
    /// Every nested overlay adds a level of indirection to each load; deep
    /// stacks are better flattened with [`squash`](crate::memory::squash).
    pub overlay_depth_warning: usize,

    /// Whether memories verify their internal invariants after every store.
    ///
    /// A violation is a bug in this crate and panics.
    pub check_invariants: bool,
}

impl Default for MemoryConfig {
    /// Creates the default memory configuration.
    ///
    /// See the struct documentation for default values.
    fn default() -> Self {
        Self {
            overlay_depth_warning: 4,
            check_invariants: cfg!(debug_assertions),
        }
    }
}

impl MemoryConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for tests and debugging.
    ///
    /// Checks invariants after every store and warns as soon as overlays are
    /// nested.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            overlay_depth_warning: 2,
            check_invariants: true,
        }
    }

    /// Configuration for throughput.
    ///
    /// Disables invariant checks and nesting warnings.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            overlay_depth_warning: usize::MAX,
            check_invariants: false,
        }
    }

    /// Sets the overlay nesting depth above which a warning is logged.
    ///
    /// # Arguments
    ///
    /// * `depth` - Maximum depth built without a warning
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    #[must_use]
    pub fn with_overlay_depth_warning(mut self, depth: usize) -> Self {
        self.overlay_depth_warning = depth;
        self
    }

    /// Enables or disables invariant checks after every store.
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    #[must_use]
    pub fn with_check_invariants(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }
}
