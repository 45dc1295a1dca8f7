//! Flattening of layered memories.

use log::debug;

use crate::{
    expr::Width,
    memory::{Addr, Memory, SparseMemory},
    Error, Result,
};

/// Largest range loaded and stored as a single value.
const CHUNK: Addr = 0x1000;

/// Copies the contents of `memory` into a single sparse memory.
///
/// Every range reported by [`Memory::blocks`] is loaded, folded and stored
/// again in chunks of at most 4 KiB. Loads from the result return values equal
/// to those of `memory` after folding, but go through one layer only.
///
/// # Errors
///
/// Returns [`Error::IncompleteLoad`] if `memory` reports a block it cannot
/// load.
///
/// # Example
///
/// ```rust
/// use symmem::prelude::*;
///
/// let mut memory = OverlayMemory::new(BytesMemory::new([(0u64, vec![1u8; 16])])?, SparseMemory::new());
/// memory.store(4, Expr::from_u64(2, Width::W8), Width::W8);
///
/// let flat = squash(&memory)?;
/// assert_eq!(flat.depth(), 1);
/// assert_eq!(flat.load(3, Width::W16).unwrap().fold(), Expr::from_u64(0x0201, Width::W16));
/// # Ok::<(), symmem::Error>(())
/// ```
pub fn squash(memory: &dyn Memory) -> Result<SparseMemory> {
    let blocks = memory.blocks();
    debug!(
        "squashing {} blocks of a memory {} layers deep",
        blocks.len(),
        memory.depth()
    );

    let mut flat = SparseMemory::new();
    for block in &blocks {
        let mut addr = block.begin();
        while addr < block.end() {
            let len = (block.end() - addr).min(CHUNK);
            #[allow(clippy::cast_possible_truncation)] // Bounded by CHUNK
            let width = Width::new(len as u32);

            let value = memory
                .load(addr, width)
                .ok_or(Error::IncompleteLoad { addr, width })?;
            flat.store(addr, value.fold(), width);

            addr += len;
        }
    }

    Ok(flat)
}
