//! Canonical sets of disjoint intervals.
//!
//! [`IntervalMap`] is the value type returned by every `missing` and `blocks`
//! query of the memory layer. Maps are immutable: every operation returns a
//! new map.
//!
//! # Canonical Form
//!
//! A map is always stored sorted by `begin`, and no two of its intervals
//! overlap or touch. Two maps describing the same point set are therefore
//! structurally identical, which makes `==` a set comparison. Zero-length
//! inputs describe no points and are dropped during construction.

use std::{cmp, fmt, slice};

use crate::interval::Interval;

/// A sorted set of disjoint, non-adjacent intervals.
///
/// # Example
///
/// ```rust
/// use symmem::interval::{Interval, IntervalMap};
///
/// let a = IntervalMap::new([Interval::new(0u64, 4), Interval::new(4, 8)]);
/// let b = IntervalMap::from(Interval::new(2u64, 6));
///
/// assert_eq!(a.intervals(), &[Interval::new(0, 8)]);
/// assert_eq!(a.complement(&b).intervals(), &[Interval::new(0, 2), Interval::new(6, 8)]);
/// assert_eq!(a.intersect(&b), b);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntervalMap<T> {
    intervals: Vec<Interval<T>>,
}

/// Appends `intv` to an already canonical, sorted list, merging it with the
/// last entry when the two overlap or touch.
///
/// `intv.begin()` must not be smaller than the begin of the last entry.
fn push_merged<T: Copy + Ord + fmt::Debug>(out: &mut Vec<Interval<T>>, intv: Interval<T>) {
    if intv.is_empty() {
        return;
    }

    match out.last_mut() {
        Some(last) if intv.begin() <= last.end() => {
            if intv.end() > last.end() {
                *last = Interval::new(last.begin(), intv.end());
            }
        }
        _ => out.push(intv),
    }
}

impl<T> IntervalMap<T> {
    /// Returns the number of disjoint intervals in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the map contains no intervals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns the `idx`-th interval in ascending order.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Interval<T>> {
        self.intervals.get(idx)
    }

    /// Returns the intervals as a sorted slice.
    #[must_use]
    pub fn intervals(&self) -> &[Interval<T>] {
        &self.intervals
    }

    /// Iterates the intervals in ascending order.
    pub fn iter(&self) -> slice::Iter<'_, Interval<T>> {
        self.intervals.iter()
    }
}

impl<T: Copy + Ord + fmt::Debug> IntervalMap<T> {
    /// Builds a canonical map from arbitrary intervals.
    ///
    /// Intervals are sorted by `begin` and swept left to right. An interval
    /// starts a new entry unless it overlaps or touches the previous entry,
    /// in which case that entry is extended to the larger of both ends.
    #[must_use]
    pub fn new<I: IntoIterator<Item = Interval<T>>>(intervals: I) -> Self {
        let mut raw: Vec<Interval<T>> = intervals.into_iter().collect();
        raw.sort_unstable_by_key(Interval::begin);

        let mut merged = Vec::with_capacity(raw.len());
        for intv in raw {
            push_merged(&mut merged, intv);
        }

        IntervalMap { intervals: merged }
    }

    /// Creates an empty map.
    #[must_use]
    pub fn empty() -> Self {
        IntervalMap {
            intervals: Vec::new(),
        }
    }

    /// Checks whether `point` lies in any interval of the map.
    #[must_use]
    pub fn contains(&self, point: T) -> bool {
        let idx = self.intervals.partition_point(|intv| intv.end() <= point);
        self.intervals
            .get(idx)
            .is_some_and(|intv| intv.contains(point))
    }

    /// Returns the smallest interval covering every interval of the map.
    #[must_use]
    pub fn span(&self) -> Option<Interval<T>> {
        let first = self.intervals.first()?;
        let last = self.intervals.last()?;
        Some(Interval::new(first.begin(), last.end()))
    }

    /// Returns the set of points present in `self`, `other` or both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = Vec::with_capacity(self.len() + other.len());
        let (mut a, mut b) = (self.iter().peekable(), other.iter().peekable());

        loop {
            let next = match (a.peek().copied(), b.peek().copied()) {
                (Some(x), Some(y)) if x.begin() < y.begin() => a.next(),
                (Some(_), Some(_)) => b.next(),
                (Some(_), None) => a.next(),
                (None, Some(_)) => b.next(),
                (None, None) => break,
            };

            if let Some(intv) = next {
                push_merged(&mut out, *intv);
            }
        }

        IntervalMap { intervals: out }
    }

    /// Returns the set of points present in both `self` and `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < self.len() && j < other.len() {
            let (x, y) = (self.intervals[i], other.intervals[j]);

            let begin = cmp::max(x.begin(), y.begin());
            let end = cmp::min(x.end(), y.end());
            if begin < end {
                push_merged(&mut out, Interval::new(begin, end));
            }

            if x.end() < y.end() {
                i += 1;
            } else {
                j += 1;
            }
        }

        IntervalMap { intervals: out }
    }

    /// Returns the points of `self` which are not covered by `other`.
    ///
    /// An interval of `self` partially covered by `other` is split into the
    /// uncovered pieces; an interval fully covered disappears.
    #[must_use]
    pub fn complement(&self, other: &Self) -> Self {
        let mut out = Vec::with_capacity(self.len());
        let mut first = 0;

        for intv in &self.intervals {
            let end = intv.end();
            let mut begin = intv.begin();

            // Intervals of `other` ending before `intv` cannot touch any later
            // interval of `self` either.
            while first < other.len() && other.intervals[first].end() <= begin {
                first += 1;
            }

            let mut covered = false;
            for sub in other.intervals[first..]
                .iter()
                .take_while(|sub| sub.begin() < end)
            {
                if begin < sub.begin() {
                    out.push(Interval::new(begin, sub.begin()));
                }

                if sub.end() < end {
                    begin = sub.end();
                } else {
                    covered = true;
                    break;
                }
            }

            if !covered {
                out.push(Interval::new(begin, end));
            }
        }

        IntervalMap { intervals: out }
    }
}

impl<T> Default for IntervalMap<T> {
    fn default() -> Self {
        IntervalMap {
            intervals: Vec::new(),
        }
    }
}

impl<T: Copy + Ord + fmt::Debug> From<Interval<T>> for IntervalMap<T> {
    fn from(intv: Interval<T>) -> Self {
        IntervalMap::new([intv])
    }
}

impl<T: Copy + Ord + fmt::Debug> FromIterator<Interval<T>> for IntervalMap<T> {
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        IntervalMap::new(iter)
    }
}

impl<'a, T> IntoIterator for &'a IntervalMap<T> {
    type Item = &'a Interval<T>;
    type IntoIter = slice::Iter<'a, Interval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl<T: fmt::Display> fmt::Display for IntervalMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, intv) in self.intervals.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{intv}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(intervals: &[(i64, i64)]) -> IntervalMap<i64> {
        intervals
            .iter()
            .map(|&(begin, end)| Interval::new(begin, end))
            .collect()
    }

    #[test]
    fn test_new_keeps_disjoint_sequence() {
        let m = map(&[(1, 3), (4, 7), (12, 16)]);
        assert_eq!(m, map(&[(1, 3), (4, 7), (12, 16)]));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_new_joins_touching_intervals() {
        let m = map(&[(0, 1), (1, 3), (3, 4), (4, 7), (7, 16), (17, 23)]);
        assert_eq!(m.intervals(), &[Interval::new(0, 16), Interval::new(17, 23)]);
    }

    #[test]
    fn test_new_drops_zero_length() {
        let m = map(&[(0, 0), (1, 3), (3, 4), (4, 7), (7, 16)]);
        assert_eq!(m.intervals(), &[Interval::new(1, 16)]);

        let m = map(&[(5, 5)]);
        assert!(m.is_empty());
    }

    #[test]
    fn test_new_overlapping_and_unsorted() {
        assert_eq!(map(&[(0, 1), (1, 4), (3, 4)]), map(&[(0, 4)]));
        assert_eq!(
            map(&[(5, 7), (1, 4), (0, 1), (7, 9)]).intervals(),
            &[Interval::new(0, 4), Interval::new(5, 9)]
        );
        assert_eq!(map(&[(0, 10), (2, 3)]), map(&[(0, 10)]));
    }

    #[test]
    fn test_union_non_overlapping() {
        let a = map(&[(1, 2), (3, 5), (6, 7)]);
        let b = map(&[(-1, 0), (8, 13)]);
        let exp = map(&[(-1, 0), (1, 2), (3, 5), (6, 7), (8, 13)]);

        assert_eq!(a.union(&b), exp);
        assert_eq!(b.union(&a), exp);
    }

    #[test]
    fn test_union_complementary() {
        let a = map(&[(1, 2), (3, 5), (6, 7)]);
        let b = map(&[(2, 3), (5, 6)]);

        assert_eq!(a.union(&b), map(&[(1, 7)]));
        assert_eq!(b.union(&a), map(&[(1, 7)]));
    }

    #[test]
    fn test_union_subset() {
        let a = map(&[(1, 4), (5, 8), (9, 14)]);
        let b = map(&[(2, 3), (5, 7), (11, 14)]);

        assert_eq!(a.union(&b), a);
        assert_eq!(b.union(&a), a);
    }

    #[test]
    fn test_union_complementary_overlapping() {
        let a = map(&[(1, 2), (3, 5), (6, 7), (12, 15), (18, 25), (27, 31)]);
        let b = map(&[(0, 3), (2, 6), (7, 14), (7, 14), (15, 21), (20, 29)]);

        assert_eq!(a.union(&b), map(&[(0, 31)]));
        assert_eq!(b.union(&a), map(&[(0, 31)]));
    }

    #[test]
    fn test_union_with_empty() {
        let a = map(&[(1, 2)]);
        assert_eq!(a.union(&IntervalMap::empty()), a);
        assert_eq!(IntervalMap::empty().union(&a), a);
    }

    #[test]
    fn test_intersect() {
        let a = map(&[(1, 5), (6, 8), (12, 17)]);
        let b = map(&[(4, 6), (7, 14)]);

        assert_eq!(a.intersect(&b), map(&[(4, 5), (7, 8), (12, 14)]));
        assert_eq!(b.intersect(&a), map(&[(4, 5), (7, 8), (12, 14)]));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = map(&[(1, 2), (3, 5)]);
        let b = map(&[(2, 3), (5, 9)]);

        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn test_complement_non_overlapping() {
        let a = map(&[(1, 2), (3, 5), (6, 7)]);
        let b = map(&[(-1, 0), (8, 13)]);

        assert_eq!(a.complement(&b), a);
    }

    #[test]
    fn test_complement_overlapping() {
        let a = map(&[(1, 5), (6, 8), (12, 17)]);
        let b = map(&[(4, 6), (6, 16)]);

        assert_eq!(a.complement(&b), map(&[(1, 4), (16, 17)]));
    }

    #[test]
    fn test_complement_splits_interval() {
        let a = map(&[(1, 17)]);
        let b = map(&[(3, 4), (7, 9), (12, 16)]);

        assert_eq!(
            a.complement(&b),
            map(&[(1, 3), (4, 7), (9, 12), (16, 17)])
        );
    }

    #[test]
    fn test_complement_one_subtrahend_spanning_two_intervals() {
        let a = map(&[(0, 4), (6, 10)]);
        let b = map(&[(2, 8)]);

        assert_eq!(a.complement(&b), map(&[(0, 2), (8, 10)]));
    }

    #[test]
    fn test_complement_full_coverage() {
        let a = map(&[(3, 9)]);
        assert!(a.complement(&map(&[(0, 20)])).is_empty());
        assert!(a.complement(&a).is_empty());
    }

    #[test]
    fn test_contains_and_span() {
        let m = map(&[(1, 3), (10, 12)]);
        assert!(m.contains(1));
        assert!(m.contains(11));
        assert!(!m.contains(3));
        assert!(!m.contains(0));
        assert!(!m.contains(12));
        assert_eq!(m.span(), Some(Interval::new(1, 12)));
        assert_eq!(IntervalMap::<i64>::empty().span(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(map(&[(1, 3), (10, 12)]).to_string(), "{[1, 3), [10, 12)}");
        assert_eq!(IntervalMap::<i64>::empty().to_string(), "{}");
    }
}
