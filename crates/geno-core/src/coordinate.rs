//! Buffer coordinates.

use std::cmp::Ordering;

/// A `(column, line)` location inside a line buffer.
///
/// Coordinates are ordered by line first and column second, which is the order cursors are
/// visited in when an edit is broadcast across a cursor set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Zero-based column, counted in characters.
    pub x: usize,
    /// Zero-based line index.
    pub y: usize,
}

impl Coordinate {
    /// Create a coordinate from a column and a line.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The first column of line `y`.
    pub const fn line_start(y: usize) -> Self {
        Self { x: 0, y }
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then_with(|| self.x.cmp(&other.x))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// How coordinates at or after an edit point move once the edit has been applied.
///
/// A shift describes one structural change in the old coordinate space:
///
/// - coordinates before `start` are untouched
/// - coordinates inside the removed range `[start, end)` collapse to `start`
/// - coordinates on line `end.y` at or after `end` move by `(x_offset, y_offset)`
/// - coordinates on later lines only move by `y_offset`
///
/// Insertions use `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineShift {
    /// Start of the affected range (old coordinates).
    pub start: Coordinate,
    /// End of the removed range (old coordinates); equal to `start` for pure insertions.
    pub end: Coordinate,
    /// Column delta for coordinates on the edit's end line.
    pub x_offset: isize,
    /// Line delta for every coordinate at or after `end`.
    pub y_offset: isize,
}

impl LineShift {
    /// A shift that moves nothing.
    pub const fn none(at: Coordinate) -> Self {
        Self {
            start: at,
            end: at,
            x_offset: 0,
            y_offset: 0,
        }
    }

    /// Shift produced by inserting text at `at` that ends at `after` (new coordinates).
    pub fn insertion(at: Coordinate, after: Coordinate) -> Self {
        Self {
            start: at,
            end: at,
            x_offset: after.x as isize - at.x as isize,
            y_offset: after.y as isize - at.y as isize,
        }
    }

    /// Shift produced by removing `[start, end)`.
    pub fn removal(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start,
            end,
            x_offset: start.x as isize - end.x as isize,
            y_offset: start.y as isize - end.y as isize,
        }
    }

    /// Returns `true` if applying this shift cannot move any coordinate.
    pub fn is_identity(&self) -> bool {
        self.start == self.end && self.x_offset == 0 && self.y_offset == 0
    }

    /// Map an old coordinate to its location after the edit.
    pub fn apply(&self, c: Coordinate) -> Coordinate {
        if c < self.start {
            return c;
        }
        if c < self.end {
            return self.start;
        }
        if c.y == self.end.y {
            Coordinate::new(offset(c.x, self.x_offset), offset(c.y, self.y_offset))
        } else {
            Coordinate::new(c.x, offset(c.y, self.y_offset))
        }
    }
}

fn offset(value: usize, delta: isize) -> usize {
    if delta >= 0 {
        value.saturating_add(delta as usize)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_line_major() {
        assert!(Coordinate::new(9, 0) < Coordinate::new(0, 1));
        assert!(Coordinate::new(1, 2) > Coordinate::new(0, 2));
        assert_eq!(Coordinate::new(3, 3), Coordinate::new(3, 3));
    }

    #[test]
    fn test_insertion_shift_moves_same_line_in_x() {
        let shift = LineShift::insertion(Coordinate::new(2, 0), Coordinate::new(3, 0));
        assert_eq!(shift.apply(Coordinate::new(1, 0)), Coordinate::new(1, 0));
        assert_eq!(shift.apply(Coordinate::new(2, 0)), Coordinate::new(3, 0));
        assert_eq!(shift.apply(Coordinate::new(2, 1)), Coordinate::new(2, 1));
    }

    #[test]
    fn test_line_join_shift() {
        // Joining line 1 (at column 0) onto a line of length 4.
        let shift = LineShift::removal(Coordinate::new(4, 0), Coordinate::new(0, 1));
        assert_eq!(shift.apply(Coordinate::new(2, 1)), Coordinate::new(6, 0));
        assert_eq!(shift.apply(Coordinate::new(2, 3)), Coordinate::new(2, 2));
    }

    #[test]
    fn test_removed_range_collapses_to_start() {
        let shift = LineShift::removal(Coordinate::new(1, 0), Coordinate::new(2, 2));
        assert_eq!(shift.apply(Coordinate::new(5, 1)), Coordinate::new(1, 0));
        assert_eq!(shift.apply(Coordinate::new(3, 2)), Coordinate::new(2, 0));
    }
}
