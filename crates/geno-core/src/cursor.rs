//! Cursor and selection state.

use crate::buffer::ordered;
use crate::coordinate::{Coordinate, LineShift};

/// Whether typed characters are inserted or overwrite the character under the caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorInputMode {
    /// Insert before the caret.
    #[default]
    Normal,
    /// Overwrite the character under the caret.
    Insert,
}

/// How a cursor set reacts to selection gestures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MultiCursorMode {
    /// Independent cursors.
    #[default]
    Normal,
    /// Rectangular selection: one cursor per spanned line.
    Box,
}

/// Direction a box selection was dragged in, relative to its anchor line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoxModeDirection {
    /// Lines above the anchor.
    Up,
    /// Lines below the anchor.
    Down,
    /// Only the anchor line.
    #[default]
    None,
}

/// A caret with an optional selection.
///
/// `selection_start <= selection_end` holds at all times; `selection_origin` remembers
/// which end the user anchored the selection at, or `None` when no anchor has been set yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Caret location.
    pub position: Coordinate,
    /// Lower end of the selection.
    pub selection_start: Coordinate,
    /// Upper end of the selection.
    pub selection_end: Coordinate,
    /// Where the selection was anchored.
    pub selection_origin: Option<Coordinate>,
    /// Marked for removal at the end of the current operation.
    pub disabled: bool,
}

impl Cursor {
    /// A caret at `position` without a selection.
    pub fn at(position: Coordinate) -> Self {
        Self {
            position,
            selection_start: position,
            selection_end: position,
            selection_origin: None,
            disabled: false,
        }
    }

    /// Returns `true` if the selection is non-empty.
    pub fn has_selection(&self) -> bool {
        self.selection_start != self.selection_end
    }

    /// Set the selection to the span between `a` and `b`, in either order.
    pub fn set_selection(&mut self, a: Coordinate, b: Coordinate) {
        let (start, end) = ordered(a, b);
        self.selection_start = start;
        self.selection_end = end;
    }

    /// Select from `origin` to `to` and put the caret at `to`.
    pub fn select_from(&mut self, origin: Coordinate, to: Coordinate) {
        self.selection_origin = Some(origin);
        self.position = to;
        self.set_selection(origin, to);
    }

    /// Extend (or start) a selection from the current anchor to `to`.
    pub fn extend_to(&mut self, to: Coordinate) {
        let origin = match self.selection_origin {
            Some(origin) if self.has_selection() => origin,
            _ => self.position,
        };
        self.select_from(origin, to);
    }

    /// Drop the selection, keeping the caret where it is.
    pub fn clear_selection(&mut self) {
        self.selection_start = self.position;
        self.selection_end = self.position;
        self.selection_origin = None;
    }

    /// Drop the selection and put the caret at its start.
    pub fn collapse_to_start(&mut self) {
        self.move_to(self.selection_start);
    }

    /// Drop the selection and put the caret at its end.
    pub fn collapse_to_end(&mut self) {
        self.move_to(self.selection_end);
    }

    /// Move the caret to `position` and drop the selection.
    pub fn move_to(&mut self, position: Coordinate) {
        self.position = position;
        self.clear_selection();
    }

    /// Returns `true` if `c` lies strictly inside the selection, or on one of its ends.
    pub fn contains(&self, c: Coordinate) -> bool {
        self.has_selection() && self.selection_start <= c && c <= self.selection_end
    }

    /// Returns `true` if both selections are non-empty and share at least one character.
    pub fn overlaps(&self, other: &Cursor) -> bool {
        self.has_selection()
            && other.has_selection()
            && self.selection_start < other.selection_end
            && other.selection_start < self.selection_end
    }

    /// Map every coordinate of this cursor through `shift`.
    pub fn apply_shift(&mut self, shift: &LineShift) {
        self.position = shift.apply(self.position);
        self.selection_start = shift.apply(self.selection_start);
        self.selection_end = shift.apply(self.selection_end);
        self.selection_origin = self.selection_origin.map(|o| shift.apply(o));
    }
}
