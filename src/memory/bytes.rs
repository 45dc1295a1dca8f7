//! Concrete byte memory.
//!
//! [`BytesMemory`] holds contiguous blocks of raw bytes, typically the loaded
//! segments of a program image. It only accepts concrete values. Blocks are
//! kept sorted, disjoint and non-adjacent: touching blocks are merged both
//! on construction and after every store.

use log::{debug, trace};

use crate::{
    expr::{Const, Expr, Width},
    interval::{Interval, IntervalMap},
    memory::{range_end, requested, Addr, Memory, MemoryConfig},
    Error, Result,
};

/// A source of an initial byte block.
///
/// Implemented for [`Block`] and for `(Addr, Vec<u8>)` and `(Addr, &[u8])`
/// tuples, so segment data can be handed over without an intermediate type.
pub trait ByteBlock {
    /// Returns the address of the first byte.
    fn begin(&self) -> Addr;

    /// Returns the block contents.
    fn bytes(&self) -> &[u8];
}

/// A contiguous run of bytes starting at a fixed address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    begin: Addr,
    bytes: Vec<u8>,
}

impl Block {
    /// Creates a block of `bytes` starting at `begin`.
    #[must_use]
    pub fn new(begin: Addr, bytes: Vec<u8>) -> Self {
        Block { begin, bytes }
    }

    /// Returns the address one past the last byte.
    #[must_use]
    pub fn end(&self) -> Addr {
        self.begin + self.bytes.len() as u64
    }

    fn interval(&self) -> Interval<Addr> {
        Interval::new(self.begin, self.end())
    }

    #[allow(clippy::cast_possible_truncation)] // Offsets are bounded by the block length
    fn offset(&self, addr: Addr) -> usize {
        (addr - self.begin) as usize
    }
}

impl ByteBlock for Block {
    fn begin(&self) -> Addr {
        self.begin
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl ByteBlock for (Addr, Vec<u8>) {
    fn begin(&self) -> Addr {
        self.0
    }

    fn bytes(&self) -> &[u8] {
        &self.1
    }
}

impl ByteBlock for (Addr, &[u8]) {
    fn begin(&self) -> Addr {
        self.0
    }

    fn bytes(&self) -> &[u8] {
        self.1
    }
}

/// A memory of concrete bytes.
///
/// # Example
///
/// ```rust
/// use symmem::prelude::*;
///
/// let mut memory = BytesMemory::new([
///     (25u64, vec![1u8, 2, 3, 4, 5, 6, 7, 8, 9]),
///     (34, vec![11, 12, 13, 14]),
/// ])?;
/// assert_eq!(memory.blocks_iter().count(), 1);
///
/// memory.store(40, Expr::from_u64(0xAB, Width::W8), Width::W8);
/// assert_eq!(memory.blocks().len(), 2);
///
/// let symbolic = memory.try_store(0, &Expr::symbol("x", Width::W8), Width::W8);
/// assert!(matches!(symbolic, Err(Error::NotConstant(_))));
/// # Ok::<(), symmem::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct BytesMemory {
    blocks: Vec<Block>,
    config: MemoryConfig,
}

impl BytesMemory {
    /// Creates a memory holding copies of `blocks`.
    ///
    /// Blocks may be given in any order. Touching blocks are merged and empty
    /// blocks are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OverlappingBlocks`] if two blocks share a byte, and
    /// [`Error::AddressOverflow`] if a block runs past the end of the address
    /// space.
    pub fn new<I, B>(blocks: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: ByteBlock,
    {
        Self::with_config(blocks, MemoryConfig::default())
    }

    /// Creates a memory holding copies of `blocks` with the given
    /// configuration.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn with_config<I, B>(blocks: I, config: MemoryConfig) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: ByteBlock,
    {
        let mut owned = Vec::new();
        for block in blocks {
            let (begin, bytes) = (block.begin(), block.bytes());
            if bytes.is_empty() {
                continue;
            }
            if begin.checked_add(bytes.len() as u64).is_none() {
                return Err(Error::AddressOverflow {
                    begin,
                    len: bytes.len(),
                });
            }
            owned.push(Block::new(begin, bytes.to_vec()));
        }

        owned.sort_unstable_by_key(|block| block.begin);
        let blocks = coalesce(owned)?;
        debug!("bytes memory created with {} blocks", blocks.len());

        Ok(BytesMemory { blocks, config })
    }

    /// Returns an iterator over `(begin, bytes)` of every block in address
    /// order.
    pub fn blocks_iter(&self) -> impl Iterator<Item = (Addr, &[u8])> + '_ {
        self.blocks.iter().map(|block| (block.begin, block.bytes.as_slice()))
    }

    /// Stores `value` as `width` bytes at `addr`.
    ///
    /// This is the fallible form of [`Memory::store`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConstant`] if `value` does not fold to a constant.
    /// The memory is left unchanged. A zero-width store always succeeds and
    /// writes nothing.
    ///
    /// # Panics
    ///
    /// Panics if `addr + width` overflows the address space.
    pub fn try_store(&mut self, addr: Addr, value: &Expr, width: Width) -> Result<()> {
        if width.is_zero() {
            trace!("bytes store of zero width at {addr:#x} ignored");
            return Ok(());
        }
        let folded = value.fold();
        let Some(value) = folded.as_const() else {
            return Err(Error::NotConstant(value.to_string()));
        };

        let end = range_end(addr, width);
        trace!("bytes store [{addr:#x}, {end:#x})");

        let bytes = value.resize(width).into_bytes();
        let mut written = 0;
        while written < bytes.len() {
            written += self.write_chunk(addr + written as u64, &bytes[written..]);
        }

        match coalesce(std::mem::take(&mut self.blocks)) {
            Ok(blocks) => self.blocks = blocks,
            Err(err) => panic!("store left overlapping blocks: {err}"),
        }

        if self.config.check_invariants {
            self.check_invariants();
        }

        Ok(())
    }

    /// Verifies that blocks are non-empty, sorted, disjoint and non-adjacent.
    ///
    /// # Panics
    ///
    /// Panics on the first violated invariant.
    pub fn check_invariants(&self) {
        for block in &self.blocks {
            assert!(!block.bytes.is_empty(), "empty block at {:#x}", block.begin);
        }
        for pair in self.blocks.windows(2) {
            assert!(
                pair[0].end() < pair[1].begin,
                "block ending at {:#x} is not separated from block at {:#x}",
                pair[0].end(),
                pair[1].begin
            );
        }
    }

    /// Returns the index of the block containing `addr`.
    fn find(&self, addr: Addr) -> Option<usize> {
        let idx = self.blocks.partition_point(|block| block.end() <= addr);
        self.blocks
            .get(idx)
            .filter(|block| block.begin <= addr)
            .map(|_| idx)
    }

    /// Writes a prefix of `bytes` at `addr` and returns its length.
    ///
    /// Inside a block the write stops at the block end. Outside a block a new
    /// block is inserted, stopping at the start of the next one.
    fn write_chunk(&mut self, addr: Addr, bytes: &[u8]) -> usize {
        if let Some(idx) = self.find(addr) {
            let block = &mut self.blocks[idx];
            let from = block.offset(addr);
            let n = bytes.len().min(block.bytes.len() - from);
            block.bytes[from..from + n].copy_from_slice(&bytes[..n]);
            return n;
        }

        let idx = self.blocks.partition_point(|block| block.begin <= addr);
        let n = match self.blocks.get(idx) {
            Some(next) => usize::try_from(next.begin - addr).map_or(bytes.len(), |gap| gap.min(bytes.len())),
            None => bytes.len(),
        };

        self.blocks.insert(idx, Block::new(addr, bytes[..n].to_vec()));
        n
    }
}

/// Merges touching blocks of a list sorted by begin.
fn coalesce(blocks: Vec<Block>) -> Result<Vec<Block>> {
    let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let Some(last) = merged.last_mut() {
            let end = last.end();
            if end > block.begin {
                return Err(Error::OverlappingBlocks {
                    end,
                    begin: block.begin,
                });
            }
            if end == block.begin {
                debug!("merging block at {:#x} into block at {:#x}", block.begin, last.begin);
                last.bytes.extend_from_slice(&block.bytes);
                continue;
            }
        }
        merged.push(block);
    }
    Ok(merged)
}

impl Memory for BytesMemory {
    fn load(&self, addr: Addr, width: Width) -> Option<Expr> {
        if width.is_zero() {
            return None;
        }

        let end = range_end(addr, width);
        let block = &self.blocks[self.find(addr)?];
        if block.end() < end {
            trace!("bytes load [{addr:#x}, {end:#x}) crosses block end {:#x}", block.end());
            return None;
        }

        let from = block.offset(addr);
        let bytes = &block.bytes[from..from + width.as_usize()];
        Some(Expr::Const(Const::new(bytes, width)))
    }

    /// Stores a constant `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a constant (see [`BytesMemory::try_store`])
    /// or if `addr + width` overflows the address space.
    fn store(&mut self, addr: Addr, value: Expr, width: Width) {
        if let Err(err) = self.try_store(addr, &value, width) {
            panic!("bytes memory accepts only constants: {err}");
        }
    }

    fn missing(&self, addr: Addr, width: Width) -> IntervalMap<Addr> {
        requested(addr, width).complement(&self.blocks())
    }

    fn blocks(&self) -> IntervalMap<Addr> {
        self.blocks.iter().map(Block::interval).collect()
    }
}
