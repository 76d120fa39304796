//! Caret movement and selection gestures.
//!
//! Like edits, movement applies to every enabled cursor and resolves collisions afterwards,
//! so two carets that meet at a line edge become one.

use crate::buffer::{LineBuffer, is_word_char};
use crate::coordinate::Coordinate;
use crate::cursor::Cursor;
use crate::edit::Document;

impl Document {
    fn move_each(&mut self, shift: bool, target: impl Fn(&LineBuffer, &Cursor) -> Coordinate) {
        self.cursors.prepare_box_mode_for_input();
        for index in 0..self.cursors.len() {
            let Some(cursor) = self.cursors.get(index).copied().filter(|c| !c.disabled) else {
                continue;
            };
            let to = self.buffer.clamp(target(&self.buffer, &cursor));
            if let Some(cursor) = self.cursors.get_mut(index) {
                if shift {
                    cursor.extend_to(to);
                } else {
                    cursor.move_to(to);
                }
            }
        }
        self.finish_operation();
    }

    /// Move every caret one character (or one word with `ctrl`) to the left.
    ///
    /// Without `shift`, a caret with a selection first collapses to the selection start.
    pub fn move_left(&mut self, ctrl: bool, shift: bool) {
        self.move_each(shift, |buffer, cursor| {
            if !shift && !ctrl && cursor.has_selection() {
                cursor.selection_start
            } else if ctrl {
                word_left(buffer, cursor.position)
            } else {
                char_left(buffer, cursor.position)
            }
        });
    }

    /// Move every caret one character (or one word with `ctrl`) to the right.
    pub fn move_right(&mut self, ctrl: bool, shift: bool) {
        self.move_each(shift, |buffer, cursor| {
            if !shift && !ctrl && cursor.has_selection() {
                cursor.selection_end
            } else if ctrl {
                word_right(buffer, cursor.position)
            } else {
                char_right(buffer, cursor.position)
            }
        });
    }

    /// Move up one line.
    ///
    /// `alt` adds a caret above the topmost one; `alt + shift` extends a box selection.
    pub fn move_up(&mut self, shift: bool, alt: bool) {
        self.move_vertical(false, shift, alt);
    }

    /// Move down one line.
    ///
    /// `alt` adds a caret below the bottommost one; `alt + shift` extends a box selection.
    pub fn move_down(&mut self, shift: bool, alt: bool) {
        self.move_vertical(true, shift, alt);
    }

    fn move_vertical(&mut self, down: bool, shift: bool, alt: bool) {
        let tab_width = self.config().tab_width;

        if alt && shift {
            let head = match self.cursors.box_head() {
                Some(head) => head,
                None => {
                    let primary = *self.cursors.primary();
                    let anchor = primary
                        .selection_origin
                        .filter(|_| primary.has_selection())
                        .unwrap_or(primary.position);
                    self.cursors.begin_box_selection(anchor, &self.buffer);
                    primary.position
                }
            };
            let y = if down {
                head.y + 1
            } else {
                head.y.saturating_sub(1)
            };
            self.cursors
                .drag_box_selection(Coordinate::new(head.x, y), &self.buffer);
            return;
        }

        if alt {
            self.cursors.prepare_box_mode_for_input();
            let order = self.cursors.ordered_indices();
            let edge = if down { order.last() } else { order.first() };
            let Some(edge) = edge.and_then(|&i| self.cursors.get(i)).copied() else {
                return;
            };
            let at_edge = if down {
                edge.position.y + 1 >= self.buffer.line_count()
            } else {
                edge.position.y == 0
            };
            if !at_edge {
                let to = vertical(&self.buffer, edge.position, down, tab_width);
                self.cursors.add_cursor(to);
            }
            self.finish_operation();
            return;
        }

        self.move_each(shift, |buffer, cursor| {
            vertical(buffer, cursor.position, down, tab_width)
        });
    }

    /// Move to the first non-blank column, or to column 0 if already there. With `ctrl`,
    /// move to the start of the buffer.
    pub fn home(&mut self, ctrl: bool, shift: bool) {
        self.move_each(shift, |buffer, cursor| {
            let y = cursor.position.y;
            if ctrl {
                return Coordinate::default();
            }
            let indent = buffer.leading_whitespace(y).chars().count();
            if cursor.position.x == indent {
                Coordinate::line_start(y)
            } else {
                Coordinate::new(indent, y)
            }
        });
    }

    /// Move to the end of the line, or of the buffer with `ctrl`.
    pub fn end(&mut self, ctrl: bool, shift: bool) {
        self.move_each(shift, |buffer, cursor| {
            if ctrl {
                buffer.end()
            } else {
                Coordinate::new(buffer.line_len(cursor.position.y), cursor.position.y)
            }
        });
    }

    /// Replace every cursor with one selecting the whole buffer.
    pub fn select_all(&mut self) {
        let end = self.buffer.end();
        self.set_selection(Coordinate::default(), end);
    }

    /// Replace every cursor with one selecting line `y`, including its line break.
    pub fn select_line(&mut self, y: usize) {
        let y = y.min(self.buffer.line_count() - 1);
        let end = if y + 1 < self.buffer.line_count() {
            Coordinate::line_start(y + 1)
        } else {
            Coordinate::new(self.buffer.line_len(y), y)
        };
        self.set_selection(Coordinate::line_start(y), end);
    }

    /// Replace every cursor with one selecting the word at `c`. Returns the word, or `None`
    /// (leaving a plain caret at `c`) if there is no word there.
    pub fn select_word_at(&mut self, c: Coordinate) -> Option<String> {
        match self.buffer.word_at(c) {
            Some((word, start, end)) => {
                self.set_selection(start, end);
                Some(word)
            }
            None => {
                self.set_cursor(c);
                None
            }
        }
    }

    /// Replace every cursor with a caret at `c` (clamped).
    pub fn set_cursor(&mut self, c: Coordinate) {
        let c = self.buffer.clamp(c);
        self.cursors.set_single(c);
    }

    /// Replace every cursor with one selecting from `origin` to `to` (both clamped).
    pub fn set_selection(&mut self, origin: Coordinate, to: Coordinate) {
        let origin = self.buffer.clamp(origin);
        let to = self.buffer.clamp(to);
        self.cursors.set_single(to);
        if let Some(cursor) = self.cursors.get_mut(0) {
            cursor.select_from(origin, to);
        }
    }

    /// Add a caret at `c` (clamped). Returns its index.
    pub fn add_cursor(&mut self, c: Coordinate) -> usize {
        let c = self.buffer.clamp(c);
        self.cursors.prepare_box_mode_for_input();
        self.cursors.add_cursor(c)
    }

    /// Start a box selection at `anchor` (mouse down with Alt held).
    pub fn begin_box_selection(&mut self, anchor: Coordinate) {
        self.cursors.begin_box_selection(anchor, &self.buffer);
    }

    /// Extend the box selection to `to` (mouse drag with Alt held).
    pub fn drag_box_selection(&mut self, to: Coordinate) {
        self.cursors.drag_box_selection(to, &self.buffer);
    }

    /// Back to a single caret without a selection.
    pub fn escape(&mut self) {
        self.cursors.collapse_to_primary();
    }
}

fn line_chars(buffer: &LineBuffer, y: usize) -> Vec<char> {
    buffer
        .line(y)
        .map(|line| line.glyphs().iter().map(|g| g.ch).collect())
        .unwrap_or_default()
}

fn char_left(buffer: &LineBuffer, c: Coordinate) -> Coordinate {
    let c = buffer.clamp(c);
    if c.x > 0 {
        Coordinate::new(c.x - 1, c.y)
    } else if c.y > 0 {
        Coordinate::new(buffer.line_len(c.y - 1), c.y - 1)
    } else {
        c
    }
}

fn char_right(buffer: &LineBuffer, c: Coordinate) -> Coordinate {
    let c = buffer.clamp(c);
    if c.x < buffer.line_len(c.y) {
        Coordinate::new(c.x + 1, c.y)
    } else if c.y + 1 < buffer.line_count() {
        Coordinate::line_start(c.y + 1)
    } else {
        c
    }
}

fn word_left(buffer: &LineBuffer, c: Coordinate) -> Coordinate {
    let c = buffer.clamp(c);
    if c.x == 0 {
        return char_left(buffer, c);
    }
    let chars = line_chars(buffer, c.y);
    let mut x = c.x;
    while x > 0 && chars[x - 1].is_whitespace() {
        x -= 1;
    }
    if x > 0 && is_word_char(chars[x - 1]) {
        while x > 0 && is_word_char(chars[x - 1]) {
            x -= 1;
        }
    } else {
        while x > 0 && !is_word_char(chars[x - 1]) && !chars[x - 1].is_whitespace() {
            x -= 1;
        }
    }
    Coordinate::new(x, c.y)
}

fn word_right(buffer: &LineBuffer, c: Coordinate) -> Coordinate {
    let c = buffer.clamp(c);
    let chars = line_chars(buffer, c.y);
    if c.x >= chars.len() {
        return char_right(buffer, c);
    }
    let mut x = c.x;
    if is_word_char(chars[x]) {
        while x < chars.len() && is_word_char(chars[x]) {
            x += 1;
        }
    } else if !chars[x].is_whitespace() {
        while x < chars.len() && !is_word_char(chars[x]) && !chars[x].is_whitespace() {
            x += 1;
        }
    }
    while x < chars.len() && chars[x].is_whitespace() {
        x += 1;
    }
    Coordinate::new(x, c.y)
}

fn vertical(buffer: &LineBuffer, c: Coordinate, down: bool, tab_width: usize) -> Coordinate {
    let c = buffer.clamp(c);
    let last = buffer.line_count() - 1;
    let y = match (down, c.y) {
        (false, 0) => return Coordinate::default(),
        (true, y) if y >= last => return Coordinate::new(buffer.line_len(last), last),
        (false, y) => y - 1,
        (true, y) => y + 1,
    };
    let display = buffer.display_column(c, tab_width);
    Coordinate::new(buffer.column_for_display(y, display, tab_width), y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::cursor::MultiCursorMode;

    fn doc(text: &str) -> Document {
        Document::new(text, EditorConfig::default())
    }

    fn positions(doc: &Document) -> Vec<Coordinate> {
        doc.cursors().cursors().iter().map(|c| c.position).collect()
    }

    #[test]
    fn test_move_left_wraps_to_previous_line() {
        let mut d = doc("ab\ncd");
        d.set_cursor(Coordinate::new(0, 1));
        d.move_left(false, false);
        assert_eq!(positions(&d), vec![Coordinate::new(2, 0)]);
        d.set_cursor(Coordinate::default());
        d.move_left(false, false);
        assert_eq!(positions(&d), vec![Coordinate::default()]);
    }

    #[test]
    fn test_ctrl_moves_by_word() {
        let mut d = doc("foo.bar  baz");
        d.set_cursor(Coordinate::default());
        d.move_right(true, false);
        assert_eq!(positions(&d), vec![Coordinate::new(3, 0)]);
        d.move_right(true, false);
        assert_eq!(positions(&d), vec![Coordinate::new(4, 0)]);
        d.move_right(true, false);
        assert_eq!(positions(&d), vec![Coordinate::new(9, 0)]);
        d.move_left(true, false);
        assert_eq!(positions(&d), vec![Coordinate::new(4, 0)]);
    }

    #[test]
    fn test_shift_extends_selection() {
        let mut d = doc("hello");
        d.set_cursor(Coordinate::new(1, 0));
        d.move_right(false, true);
        d.move_right(false, true);
        let cursor = *d.cursors().primary();
        assert_eq!(cursor.selection_start, Coordinate::new(1, 0));
        assert_eq!(cursor.selection_end, Coordinate::new(3, 0));

        d.move_left(false, false);
        assert_eq!(positions(&d), vec![Coordinate::new(1, 0)]);
        assert!(!d.cursors().primary().has_selection());
    }

    #[test]
    fn test_vertical_move_keeps_display_column() {
        let mut d = doc("\tx\nabcdefgh\n");
        d.set_cursor(Coordinate::new(1, 0));
        d.move_down(false, false);
        assert_eq!(positions(&d), vec![Coordinate::new(4, 1)]);
        d.move_down(false, false);
        assert_eq!(positions(&d), vec![Coordinate::new(0, 2)]);
        d.move_down(false, false);
        assert_eq!(positions(&d), vec![Coordinate::new(0, 2)]);
    }

    #[test]
    fn test_carets_merge_at_buffer_start() {
        let mut d = doc("ab");
        d.set_cursor(Coordinate::new(0, 0));
        d.add_cursor(Coordinate::new(1, 0));
        d.move_left(false, false);
        assert_eq!(positions(&d), vec![Coordinate::default()]);
    }

    #[test]
    fn test_alt_adds_cursor_below() {
        let mut d = doc("abc\nabc\na");
        d.set_cursor(Coordinate::new(2, 0));
        d.move_down(false, true);
        d.move_down(false, true);
        assert_eq!(
            positions(&d),
            vec![
                Coordinate::new(2, 0),
                Coordinate::new(2, 1),
                Coordinate::new(1, 2)
            ]
        );
        d.move_down(false, true);
        assert_eq!(d.cursors().len(), 3);
        d.escape();
        assert_eq!(positions(&d), vec![Coordinate::new(2, 0)]);
    }

    #[test]
    fn test_alt_shift_extends_box_selection() {
        let mut d = doc("abcd\nabcd\nabcd");
        d.set_cursor(Coordinate::new(1, 0));
        d.move_right(false, true);
        d.move_down(true, true);
        assert_eq!(d.cursors().mode(), MultiCursorMode::Box);
        assert_eq!(d.cursors().len(), 2);
        d.insert_char('x');
        assert_eq!(d.line_text(0), "axcd");
        assert_eq!(d.line_text(1), "axcd");
    }

    #[test]
    fn test_home_toggles_between_indent_and_column_zero() {
        let mut d = doc("    code");
        d.set_cursor(Coordinate::new(6, 0));
        d.home(false, false);
        assert_eq!(positions(&d), vec![Coordinate::new(4, 0)]);
        d.home(false, false);
        assert_eq!(positions(&d), vec![Coordinate::new(0, 0)]);
        d.end(false, false);
        assert_eq!(positions(&d), vec![Coordinate::new(8, 0)]);
    }

    #[test]
    fn test_select_helpers() {
        let mut d = doc("one two\nthree");
        assert_eq!(d.select_word_at(Coordinate::new(5, 0)).as_deref(), Some("two"));
        assert_eq!(d.copy(), "two");

        d.select_line(0);
        assert_eq!(d.copy(), "one two\n");

        d.select_all();
        assert_eq!(d.copy(), "one two\nthree");

        assert_eq!(d.select_word_at(Coordinate::new(3, 0)).as_deref(), Some("one"));
        assert_eq!(d.select_word_at(Coordinate::new(99, 99)).as_deref(), Some("three"));
    }
}
