use thiserror::Error;

use crate::{expr::Width, memory::Addr};

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Missing data is not an error: loads of absent ranges return `None`. This enum covers the
/// recoverable failures, where a caller handed in data the memory layer cannot accept.
///
/// # Error Categories
///
/// ## Construction Errors
/// - [`Error::OverlappingBlocks`] - Initial byte blocks share an address
/// - [`Error::AddressOverflow`] - An initial byte block runs past the address space
///
/// ## Store and Load Errors
/// - [`Error::NotConstant`] - A symbolic value was stored into a concrete memory
/// - [`Error::IncompleteLoad`] - A reported block could not be loaded
///
/// # Examples
///
/// ```rust
/// use symmem::{memory::BytesMemory, Error};
///
/// match BytesMemory::new([(25u64, vec![0u8; 9]), (24, vec![0u8; 4])]) {
///     Ok(_) => println!("Loaded successfully"),
///     Err(Error::OverlappingBlocks { end, begin }) => {
///         println!("Block ending at {end:#x} overlaps block at {begin:#x}");
///     }
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Two initial byte blocks overlap.
    ///
    /// Blocks may touch, in which case they are merged, but no byte may be
    /// given twice.
    ///
    /// # Fields
    ///
    /// * `end` - End of the earlier block
    /// * `begin` - Start of the later block, below `end`
    #[error("Blocks overlap: block ending at {end:#x} overlaps block starting at {begin:#x}")]
    OverlappingBlocks {
        /// End of the earlier block
        end: Addr,
        /// Start of the later block
        begin: Addr,
    },

    /// An initial byte block does not fit into the address space.
    #[error("Block of {len} bytes at {begin:#x} runs past the end of the address space")]
    AddressOverflow {
        /// Start of the block
        begin: Addr,
        /// Length of the block in bytes
        len: usize,
    },

    /// A symbolic value was stored into a memory which holds concrete bytes
    /// only.
    ///
    /// The associated string is the rendered expression.
    #[error("Only constant values can be stored in a bytes memory - {0}")]
    NotConstant(String),

    /// A memory reported a range as present but could not load it.
    #[error("Could not load {width} bits at {addr:#x}")]
    IncompleteLoad {
        /// Start of the range
        addr: Addr,
        /// Width of the range
        width: Width,
    },
}
