//! Half-open intervals.

use std::{fmt, ops::Sub};

/// A single half-open interval `[begin, end)`.
///
/// Intervals are immutable once created. A zero-length interval
/// (`begin == end`) is legal and contains no points.
///
/// # Example
///
/// ```rust
/// use symmem::interval::Interval;
///
/// let intv = Interval::new(4u64, 8);
/// assert_eq!(intv.len(), 4);
/// assert!(intv.contains(4));
/// assert!(!intv.contains(8));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    begin: T,
    end: T,
}

impl<T: Copy + Ord + fmt::Debug> Interval<T> {
    /// Creates the interval `[begin, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `begin` is greater than `end`. A reversed interval is a bug in
    /// the caller, never a data-dependent condition.
    #[must_use]
    pub fn new(begin: T, end: T) -> Self {
        assert!(
            begin <= end,
            "begin is greater than end: {begin:?} > {end:?}"
        );
        Interval { begin, end }
    }

    /// Returns the inclusive start of the interval.
    #[must_use]
    pub fn begin(&self) -> T {
        self.begin
    }

    /// Returns the exclusive end of the interval.
    #[must_use]
    pub fn end(&self) -> T {
        self.end
    }

    /// Returns `true` if the interval contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Checks whether `value` lies inside `[begin, end)`.
    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.begin <= value && value < self.end
    }

    /// Returns `true` if both intervals share at least one point. An empty
    /// interval overlaps nothing.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.begin < other.end
            && other.begin < self.end
    }
}

impl<T: Copy + Ord + fmt::Debug + Sub<Output = T>> Interval<T> {
    /// Returns the number of points in the interval, `end - begin`.
    #[must_use]
    pub fn len(&self) -> T {
        self.end - self.begin
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let intv = Interval::new(10u64, 25);
        assert_eq!(intv.begin(), 10);
        assert_eq!(intv.end(), 25);
        assert_eq!(intv.len(), 15);
        assert!(!intv.is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let intv = Interval::new(10u64, 12);
        assert!(!intv.contains(9));
        assert!(intv.contains(10));
        assert!(intv.contains(11));
        assert!(!intv.contains(12));
    }

    #[test]
    fn test_zero_length_contains_nothing() {
        let intv = Interval::new(7u64, 7);
        assert!(intv.is_empty());
        assert_eq!(intv.len(), 0);
        assert!(!intv.contains(7));
    }

    #[test]
    fn test_overlaps() {
        let a = Interval::new(0u64, 10);
        assert!(a.overlaps(&Interval::new(9, 20)));
        assert!(!a.overlaps(&Interval::new(10, 20)));
        assert!(!a.overlaps(&Interval::new(5, 5)));
        assert!(!Interval::new(5u64, 5).overlaps(&a));
        assert!(!Interval::new(0u64, 0).overlaps(&Interval::new(0, 0)));
    }

    #[test]
    #[should_panic(expected = "begin is greater than end")]
    fn test_reversed_interval_panics() {
        let _ = Interval::new(5u64, 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::new(1u64, 3).to_string(), "[1, 3)");
    }
}
