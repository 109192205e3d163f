use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Vertical directions a segment may still propagate towards.
///
/// `Up` is towards row `y - 1`, `Down` towards row `y + 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feed {
    Both,
    Up,
    Down,
}

impl Feed {
    pub const fn allows_up(self) -> bool {
        matches!(self, Self::Both | Self::Up)
    }

    pub const fn allows_down(self) -> bool {
        matches!(self, Self::Both | Self::Down)
    }

    /// Feed of two segments coalesced into one: anything but agreement widens to `Both`.
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Up, Self::Up) => Self::Up,
            (Self::Down, Self::Down) => Self::Down,
            _ => Self::Both,
        }
    }

    /// Whether a segment with this feed already does everything one with `other` would.
    pub const fn covers(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Both, _) | (Self::Up, Self::Up) | (Self::Down, Self::Down)
        )
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::Both
    }
}

/// Horizontal run `[start.x, start.x + length)` on row `start.y` awaiting a sweep.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    start: Coord2,
    length: Coord,
    feed: Feed,
}

impl Segment {
    pub fn new(size: Coord2, start: Coord2, length: Coord, feed: Feed) -> Result<Self> {
        let start = validate_coords(size, start)?;
        match start.0.checked_add(length) {
            Some(end) if length > 0 && end <= size.0 => {
                Ok(Self::new_unchecked(start, length, feed))
            }
            _ => Err(SweepError::InvalidSegment),
        }
    }

    /// Half-open span `[begin, end)` on `row`.
    pub(crate) fn from_span(row: Coord, begin: Coord, end: Coord, feed: Feed) -> Self {
        debug_assert!(begin < end, "empty segment {begin}..{end} on row {row}");
        Self::new_unchecked((begin, row), end - begin, feed)
    }

    const fn new_unchecked(start: Coord2, length: Coord, feed: Feed) -> Self {
        Self {
            start,
            length,
            feed,
        }
    }

    pub const fn start(&self) -> Coord2 {
        self.start
    }

    pub const fn length(&self) -> Coord {
        self.length
    }

    pub const fn feed(&self) -> Feed {
        self.feed
    }

    pub const fn row(&self) -> Coord {
        self.start.1
    }

    pub const fn begin(&self) -> Coord {
        self.start.0
    }

    pub const fn end(&self) -> Coord {
        self.start.0 + self.length
    }

    /// Same row, and the spans overlap or touch.
    pub const fn intersects(&self, other: &Self) -> bool {
        self.row() == other.row() && self.begin() <= other.end() && other.begin() <= self.end()
    }

    pub const fn covers(&self, other: &Self) -> bool {
        self.row() == other.row()
            && self.begin() <= other.begin()
            && other.end() <= self.end()
            && self.feed.covers(other.feed)
    }

    /// Smallest segment spanning both; only meaningful for intersecting segments.
    pub fn merge(&self, other: &Self) -> Self {
        debug_assert!(self.intersects(other));
        let begin = self.begin().min(other.begin());
        let end = self.end().max(other.end());
        Self::from_span(self.row(), begin, end, self.feed.merge(other.feed))
    }
}

/// Finalized run of revealed cells `[begin, end)` on `row`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClearedRange {
    pub row: Coord,
    pub begin: Coord,
    pub end: Coord,
}

impl ClearedRange {
    pub const fn new(row: Coord, begin: Coord, end: Coord) -> Self {
        Self { row, begin, end }
    }

    pub const fn len(&self) -> Coord {
        self.end - self.begin
    }

    pub const fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    pub const fn contains(&self, (x, y): Coord2) -> bool {
        y == self.row && self.begin <= x && x < self.end
    }

    pub const fn overlaps(&self, other: &Self) -> bool {
        self.row == other.row && self.begin < other.end && other.begin < self.end
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord2> + use<> {
        let row = self.row;
        (self.begin..self.end).map(move |x| (x, row))
    }
}

impl fmt::Display for ClearedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{}, {})", self.row, self.begin, self.end)
    }
}

/// Receives every range a sweep clears, in the order they are finalized.
pub trait RangeSink {
    fn report(&mut self, range: ClearedRange);
}

impl RangeSink for Vec<ClearedRange> {
    fn report(&mut self, range: ClearedRange) {
        self.push(range);
    }
}

impl<F: FnMut(ClearedRange)> RangeSink for F {
    fn report(&mut self, range: ClearedRange) {
        self(range)
    }
}
