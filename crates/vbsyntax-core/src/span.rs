//! Source location tracking for tokens, tree nodes and diagnostics.
//!
//! A [`Location`] is an absolute character offset plus a derived 1-based
//! line/column pair. A [`Span`] is a half-open `[start, finish)` range of
//! locations. Comparisons on both types use the character index only; the
//! line/column pair is carried along for reporting.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A position in the source text.
///
/// `index` is the 0-based character offset from the start of the stream.
/// `line` and `column` are 1-based; a location with either set to zero is
/// considered invalid (see [`Location::is_valid`]).
#[derive(Clone, Copy, Default)]
pub struct Location {
    /// 0-based character offset.
    pub index: u32,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (tabs count as the scanner's tab width).
    pub column: u32,
}

impl Location {
    /// Location of the first character of a stream.
    pub const START: Location = Location {
        index: 0,
        line: 1,
        column: 1,
    };

    #[inline]
    pub const fn new(index: u32, line: u32, column: u32) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    /// Whether the location carries a real line and column.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.line != 0 && self.column != 0
    }
}

impl PartialEq for Location {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Location {}

impl PartialOrd for Location {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.line, self.column, self.index)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of source text, `finish` exclusive.
#[derive(Clone, Copy, Default)]
pub struct Span {
    pub start: Location,
    pub finish: Location,
}

impl Span {
    #[inline]
    pub const fn new(start: Location, finish: Location) -> Self {
        Self { start, finish }
    }

    /// A zero-length span at `location`.
    #[inline]
    pub const fn point(location: Location) -> Self {
        Self {
            start: location,
            finish: location,
        }
    }

    /// Whether both endpoints are valid locations.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.start.is_valid() && self.finish.is_valid()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start.index == self.finish.index
    }

    /// Number of characters covered.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.finish.index.saturating_sub(self.start.index)
    }

    /// The smallest span covering both `self` and `other`.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            finish: self.finish.max(other.finish),
        }
    }

    /// A span from the start of `self` to the finish of `other`.
    #[inline]
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            finish: other.finish,
        }
    }

    /// Whether `other` lies entirely within `self`.
    #[inline]
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.finish <= self.finish
    }
}

impl PartialEq for Span {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.finish == other.finish
    }
}

impl Eq for Span {}

impl PartialOrd for Span {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Span {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start, self.finish).cmp(&(other.start, other.finish))
    }
}

impl Hash for Span {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.finish.hash(state);
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.finish)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(index: u32, line: u32, column: u32) -> Location {
        Location::new(index, line, column)
    }

    #[test]
    fn location_compares_by_index_only() {
        let a = loc(10, 1, 11);
        let b = loc(10, 7, 2);
        assert_eq!(a, b);
        assert!(loc(3, 9, 9) < loc(4, 1, 1));
    }

    #[test]
    fn location_validity() {
        assert!(Location::START.is_valid());
        assert!(!Location::default().is_valid());
        assert!(!loc(5, 1, 0).is_valid());
    }

    #[test]
    fn span_equality_uses_index_pair() {
        let a = Span::new(loc(0, 1, 1), loc(4, 1, 5));
        let b = Span::new(loc(0, 3, 3), loc(4, 3, 7));
        assert_eq!(a, b);
        assert_ne!(a, Span::new(loc(0, 1, 1), loc(5, 1, 6)));
    }

    #[test]
    fn span_merge_and_contains() {
        let a = Span::new(loc(2, 1, 3), loc(5, 1, 6));
        let b = Span::new(loc(8, 1, 9), loc(12, 1, 13));
        let m = a.merge(b);
        assert_eq!(m.start.index, 2);
        assert_eq!(m.finish.index, 12);
        assert!(m.contains(&a));
        assert!(m.contains(&b));
        assert!(!a.contains(&m));
        assert_eq!(m.len(), 10);
    }

    #[test]
    fn span_validity() {
        assert!(Span::point(Location::START).is_valid());
        assert!(Span::point(Location::START).is_empty());
        assert!(!Span::default().is_valid());
    }
}
