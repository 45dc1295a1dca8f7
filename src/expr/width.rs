//! Expression widths.

use std::{fmt, ops};

/// Width of a value in bytes.
///
/// Every expression carries an explicit width. Widths double as byte counts
/// for memory ranges and, through [`bits`](Self::bits), as shift amounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Width(u32);

impl Width {
    /// 8-bit width (1 byte).
    pub const W8: Width = Width(1);
    /// 16-bit width (2 bytes).
    pub const W16: Width = Width(2);
    /// 32-bit width (4 bytes).
    pub const W32: Width = Width(4);
    /// 64-bit width (8 bytes).
    pub const W64: Width = Width(8);

    /// Creates a width of `bytes` bytes.
    #[must_use]
    pub const fn new(bytes: u32) -> Self {
        Width(bytes)
    }

    /// Returns the width in bytes.
    #[must_use]
    pub const fn bytes(self) -> u32 {
        self.0
    }

    /// Returns the width in bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0 as u64 * 8
    }

    /// Returns the width as a byte count usable for slicing.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` for the zero width.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Width {
    fn from(bytes: u32) -> Self {
        Width(bytes)
    }
}

impl ops::Add for Width {
    type Output = Width;

    fn add(self, rhs: Width) -> Width {
        Width(self.0 + rhs.0)
    }
}

impl ops::Sub for Width {
    type Output = Width;

    fn sub(self, rhs: Width) -> Width {
        Width(self.0 - rhs.0)
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}
