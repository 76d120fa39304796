//! Multi-cursor bookkeeping.
//!
//! A [`CursorSet`] keeps the cursors of one file in insertion order. Insertion order is the
//! tie-break whenever two cursors collide: the earlier cursor survives.
//!
//! Cursors are never removed in the middle of an operation, because broadcast edits hold
//! cursor indices across many steps. Instead a cursor is marked `disabled` and the set is
//! compacted once the operation finishes ([`CursorSet::delete_disabled_cursors`]). While a
//! broadcast is running, position collisions are left alone so that every cursor gets its
//! turn; they are resolved when the broadcast finishes.

use crate::buffer::LineBuffer;
use crate::coordinate::{Coordinate, LineShift};
use crate::cursor::{BoxModeDirection, Cursor, MultiCursorMode};
use std::cmp::Ordering;

/// The ordered cursors of a file plus box-selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSet {
    cursors: Vec<Cursor>,
    mode: MultiCursorMode,
    box_direction: BoxModeDirection,
    box_anchor: Option<Coordinate>,
    box_head: Option<Coordinate>,
    defer_collisions: bool,
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorSet {
    /// A single caret at the start of the buffer.
    pub fn new() -> Self {
        Self {
            cursors: vec![Cursor::default()],
            mode: MultiCursorMode::Normal,
            box_direction: BoxModeDirection::None,
            box_anchor: None,
            box_head: None,
            defer_collisions: false,
        }
    }

    /// All cursors, including disabled ones, in insertion order.
    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    /// Number of cursors (including disabled ones).
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// Always `false`; a set holds at least one cursor between operations.
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Cursor by index.
    pub fn get(&self, index: usize) -> Option<&Cursor> {
        self.cursors.get(index)
    }

    /// Mutable cursor by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Cursor> {
        self.cursors.get_mut(index)
    }

    /// The first cursor in insertion order.
    pub fn primary(&self) -> &Cursor {
        &self.cursors[0]
    }

    /// Current multi-cursor mode.
    pub fn mode(&self) -> MultiCursorMode {
        self.mode
    }

    /// Direction of the current box selection.
    pub fn box_direction(&self) -> BoxModeDirection {
        self.box_direction
    }

    /// The unclamped point the box selection was last dragged to.
    pub fn box_head(&self) -> Option<Coordinate> {
        self.box_head.filter(|_| self.mode == MultiCursorMode::Box)
    }

    /// Number of cursors that are not disabled.
    pub fn enabled_count(&self) -> usize {
        self.cursors.iter().filter(|c| !c.disabled).count()
    }

    /// Returns `true` if any enabled cursor has a selection.
    pub fn any_selection(&self) -> bool {
        self.cursors
            .iter()
            .any(|c| !c.disabled && c.has_selection())
    }

    /// Replace every cursor with a single caret.
    pub fn set_single(&mut self, position: Coordinate) {
        self.cursors = vec![Cursor::at(position)];
        self.leave_box_mode();
    }

    /// Replace every cursor with the given ones; an empty list yields a caret at the origin.
    pub fn set_all(&mut self, cursors: Vec<Cursor>) {
        self.cursors = if cursors.is_empty() {
            vec![Cursor::default()]
        } else {
            cursors
        };
        self.leave_box_mode();
        self.yeet_duplicate_cursors();
        self.delete_disabled_cursors();
    }

    /// Add a caret. Returns the index of the new cursor, or of the existing cursor that
    /// already occupies `position`.
    pub fn add_cursor(&mut self, position: Coordinate) -> usize {
        if let Some(existing) = self
            .cursors
            .iter()
            .position(|c| !c.disabled && c.position == position)
        {
            return existing;
        }
        self.cursors.push(Cursor::at(position));
        self.cursors.len() - 1
    }

    /// Keep only the first cursor and drop its selection.
    pub fn collapse_to_primary(&mut self) {
        self.cursors.truncate(1);
        self.cursors[0].disabled = false;
        self.cursors[0].clear_selection();
        self.leave_box_mode();
    }

    /// Indices of enabled cursors sorted by ascending position (ties keep insertion order).
    pub fn ordered_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.cursors.len())
            .filter(|&i| !self.cursors[i].disabled)
            .collect();
        indices.sort_by(|&a, &b| {
            self.cursors[a]
                .position
                .cmp(&self.cursors[b].position)
                .then(a.cmp(&b))
        });
        indices
    }

    /// Index of an enabled cursor (other than `skip`) whose selection contains `c`.
    pub fn cursor_in_selection(&self, c: Coordinate, skip: Option<usize>) -> Option<usize> {
        self.cursors
            .iter()
            .enumerate()
            .find(|(i, cursor)| Some(*i) != skip && !cursor.disabled && cursor.contains(c))
            .map(|(i, _)| i)
    }

    /// Translate every cursor except `acting` through `shift`.
    ///
    /// Coordinates before the edit point stay put. Coordinates on the edit's end line move in
    /// both axes, and coordinates on later lines only move vertically. Cursors that land on
    /// the same position afterwards are resolved in favor of the lower index, unless
    /// collisions are deferred (see [`CursorSet::defer_collisions`]).
    pub fn adjust_cursors(&mut self, acting: usize, shift: &LineShift) {
        if shift.is_identity() {
            return;
        }
        for (i, cursor) in self.cursors.iter_mut().enumerate() {
            if i != acting && !cursor.disabled {
                cursor.apply_shift(shift);
            }
        }
        if !self.defer_collisions {
            self.disable_colliding_positions();
        }
    }

    /// Stop (or resume) disabling colliding cursors in [`CursorSet::adjust_cursors`].
    ///
    /// A broadcast defers collisions while it visits cursors, so a cursor that is pushed onto
    /// another one still makes its own edit. [`CursorSet::yeet_duplicate_cursors`] resolves
    /// them afterwards.
    pub fn defer_collisions(&mut self, defer: bool) {
        self.defer_collisions = defer;
    }

    /// Translate every enabled cursor through `shift`, including the one that made the edit.
    pub fn adjust_all(&mut self, shift: &LineShift) {
        self.adjust_cursors(usize::MAX, shift);
    }

    /// Move every coordinate of every cursor to the line `map` returns for it.
    ///
    /// A multi-line selection ending at column 0 owns the line break before its end, so that
    /// end follows the line above it rather than the line it sits on.
    pub fn remap_lines(&mut self, map: impl Fn(usize) -> usize) {
        let remap = |c: Coordinate| Coordinate::new(c.x, map(c.y));
        for cursor in &mut self.cursors {
            let (start, end) = (cursor.selection_start, cursor.selection_end);
            let trailing_break = end.x == 0 && end.y > start.y;
            let move_coord = |c: Coordinate| {
                if trailing_break && c == end {
                    Coordinate::line_start(map(end.y - 1) + 1)
                } else {
                    remap(c)
                }
            };
            cursor.position = move_coord(cursor.position);
            cursor.set_selection(move_coord(start), move_coord(end));
            cursor.selection_origin = cursor.selection_origin.map(move_coord);
        }
    }

    /// Resolve collisions between enabled cursors.
    ///
    /// A later cursor that shares its position with an earlier one is disabled. Two
    /// overlapping non-empty selections are merged into the earlier cursor and the later
    /// one is disabled. The scan repeats until nothing changes, so running it twice is the
    /// same as running it once.
    pub fn yeet_duplicate_cursors(&mut self) {
        loop {
            let mut changed = false;
            for i in 0..self.cursors.len() {
                if self.cursors[i].disabled {
                    continue;
                }
                for j in i + 1..self.cursors.len() {
                    if self.cursors[j].disabled {
                        continue;
                    }
                    let later = self.cursors[j];
                    let earlier = &mut self.cursors[i];
                    if earlier.position == later.position {
                        if later.has_selection() {
                            merge_selection(earlier, &later);
                        }
                        self.cursors[j].disabled = true;
                        changed = true;
                    } else if earlier.overlaps(&later) {
                        merge_selection(earlier, &later);
                        self.cursors[j].disabled = true;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// Disable every other cursor that lies entirely inside cursor `index`'s selection.
    ///
    /// Unlike position collisions, the enclosed cursor loses even when it has a lower index.
    pub fn disable_intersections_in_selection(&mut self, index: usize) {
        let Some(owner) = self.cursors.get(index).copied() else {
            return;
        };
        if !owner.has_selection() || owner.disabled {
            return;
        }
        for (i, cursor) in self.cursors.iter_mut().enumerate() {
            if i == index || cursor.disabled {
                continue;
            }
            let (start, end) = if cursor.has_selection() {
                (cursor.selection_start, cursor.selection_end)
            } else {
                (cursor.position, cursor.position)
            };
            if owner.selection_start <= start && end <= owner.selection_end {
                cursor.disabled = true;
            }
        }
    }

    /// Remove disabled cursors, walking from the back so earlier indices stay valid.
    pub fn delete_disabled_cursors(&mut self) {
        for i in (0..self.cursors.len()).rev() {
            if self.cursors[i].disabled && self.cursors.len() > 1 {
                self.cursors.remove(i);
            }
        }
        self.cursors[0].disabled = false;
    }

    /// Clamp every coordinate of every cursor into the buffer.
    pub fn clamp_all(&mut self, buffer: &LineBuffer) {
        for cursor in &mut self.cursors {
            cursor.position = buffer.clamp(cursor.position);
            let start = buffer.clamp(cursor.selection_start);
            let end = buffer.clamp(cursor.selection_end);
            cursor.set_selection(start, end);
            cursor.selection_origin = cursor.selection_origin.map(|o| buffer.clamp(o));
        }
    }

    /// Start a rectangular selection anchored at `anchor`.
    pub fn begin_box_selection(&mut self, anchor: Coordinate, buffer: &LineBuffer) {
        let y = anchor.y.min(buffer.line_count() - 1);
        let anchor = Coordinate::new(anchor.x, y);
        self.cursors = vec![Cursor::at(buffer.clamp(anchor))];
        self.mode = MultiCursorMode::Box;
        self.box_direction = BoxModeDirection::None;
        self.box_anchor = Some(anchor);
        self.box_head = Some(anchor);
    }

    /// Extend the rectangular selection to `to`.
    ///
    /// The cursor for the anchor line is always first; one cursor follows per line in the
    /// drag direction. Dragging further pushes cursors, dragging back pops them, and
    /// crossing the anchor line rebuilds the set in the new direction. Each cursor selects
    /// the column span between the anchor and `to`, clamped to its own line.
    pub fn drag_box_selection(&mut self, to: Coordinate, buffer: &LineBuffer) {
        let Some(anchor) = self.box_anchor.filter(|_| self.mode == MultiCursorMode::Box) else {
            self.begin_box_selection(to, buffer);
            return;
        };

        let to_y = to.y.min(buffer.line_count() - 1);
        self.box_head = Some(Coordinate::new(to.x, to_y));
        let direction = match to_y.cmp(&anchor.y) {
            Ordering::Greater => BoxModeDirection::Down,
            Ordering::Less => BoxModeDirection::Up,
            Ordering::Equal => BoxModeDirection::None,
        };

        if direction != self.box_direction && self.box_direction != BoxModeDirection::None {
            self.cursors.truncate(1);
        }
        self.box_direction = direction;

        let wanted = to_y.abs_diff(anchor.y) + 1;
        self.cursors.truncate(wanted);
        while self.cursors.len() < wanted {
            let line = box_line(anchor.y, self.cursors.len(), direction);
            self.cursors.push(Cursor::at(Coordinate::line_start(line)));
        }

        for (k, cursor) in self.cursors.iter_mut().enumerate() {
            let line = box_line(anchor.y, k, direction);
            let len = buffer.line_len(line);
            let from = Coordinate::new(anchor.x.min(len), line);
            let until = Coordinate::new(to.x.min(len), line);
            cursor.disabled = false;
            cursor.select_from(from, until);
        }
    }

    /// Leave box mode before text input so the per-line cursors behave as regular carets.
    pub fn prepare_box_mode_for_input(&mut self) {
        if self.mode == MultiCursorMode::Box {
            self.leave_box_mode();
        }
    }

    fn leave_box_mode(&mut self) {
        self.mode = MultiCursorMode::Normal;
        self.box_direction = BoxModeDirection::None;
        self.box_anchor = None;
        self.box_head = None;
    }

    fn disable_colliding_positions(&mut self) {
        for i in 0..self.cursors.len() {
            if self.cursors[i].disabled {
                continue;
            }
            let position = self.cursors[i].position;
            for later in self.cursors.iter_mut().skip(i + 1) {
                if !later.disabled && later.position == position {
                    later.disabled = true;
                }
            }
        }
    }
}

fn box_line(anchor_line: usize, k: usize, direction: BoxModeDirection) -> usize {
    match direction {
        BoxModeDirection::Up => anchor_line - k,
        _ => anchor_line + k,
    }
}

fn merge_selection(into: &mut Cursor, other: &Cursor) {
    let start = into.selection_start.min(other.selection_start);
    let end = into.selection_end.max(other.selection_end);
    let caret_at_start = into.has_selection() && into.position == into.selection_start;
    if caret_at_start {
        into.select_from(end, start);
    } else {
        into.select_from(start, end);
    }
}
