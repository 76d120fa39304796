//! Editing primitives.
//!
//! Every primitive comes in two flavors:
//!
//! - a single-cursor variant (`*_at`) that edits the buffer for one cursor and immediately
//!   translates every other cursor through the resulting [`LineShift`]
//! - a broadcasting wrapper that runs the single-cursor variant for every enabled cursor in
//!   ascending position order, then resolves collisions and removes disabled cursors
//!
//! Visiting cursors top to bottom means each edit only ever shifts cursors that have not
//! been visited yet, so their stored positions are correct by the time their turn comes.
//! A cursor pushed onto another one during the walk still makes its edit; duplicates are
//! only removed once every cursor has had its turn.

use crate::buffer::LineBuffer;
use crate::config::EditorConfig;
use crate::coordinate::{Coordinate, LineShift};
use crate::cursor::{Cursor, CursorInputMode, MultiCursorMode};
use crate::cursor_set::CursorSet;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A line buffer together with its cursors: the editable state of one file.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) buffer: LineBuffer,
    pub(crate) cursors: CursorSet,
    input_mode: CursorInputMode,
    config: EditorConfig,
    revision: u64,
}

impl Document {
    /// Create a document from flat text with a caret at the start.
    pub fn new(text: &str, config: EditorConfig) -> Self {
        Self {
            buffer: LineBuffer::from_text(text),
            cursors: CursorSet::new(),
            input_mode: CursorInputMode::Normal,
            config,
            revision: 0,
        }
    }

    /// The line buffer.
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// The cursor set.
    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    /// Mutable access to the cursor set. Coordinates are clamped on the next edit.
    pub fn cursors_mut(&mut self) -> &mut CursorSet {
        &mut self.cursors
    }

    /// The editor settings.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replace the editor settings.
    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    /// Current input mode.
    pub fn input_mode(&self) -> CursorInputMode {
        self.input_mode
    }

    /// Switch between insert and overwrite typing.
    pub fn set_input_mode(&mut self, mode: CursorInputMode) {
        self.input_mode = mode;
    }

    /// Incremented by every change to the buffer text.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Plain text of line `y`.
    pub fn line_text(&self, y: usize) -> String {
        self.buffer.line_text(y)
    }

    /// Derive the flat text.
    pub fn text(&self) -> String {
        self.buffer.to_text()
    }

    /// Replace the whole text, keeping cursors where they still fit.
    pub fn replace_text(&mut self, text: &str) {
        self.buffer = LineBuffer::from_text(text);
        self.cursors.clamp_all(&self.buffer);
        self.cursors.yeet_duplicate_cursors();
        self.cursors.delete_disabled_cursors();
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn active(&self, index: usize) -> Option<Cursor> {
        self.cursors.get(index).copied().filter(|c| !c.disabled)
    }

    fn place(&mut self, index: usize, position: Coordinate) {
        if let Some(cursor) = self.cursors.get_mut(index) {
            cursor.move_to(position);
        }
    }

    pub(crate) fn broadcast(&mut self, mut op: impl FnMut(&mut Self, usize)) {
        self.cursors.defer_collisions(true);
        for index in self.cursors.ordered_indices() {
            if self.active(index).is_some() {
                op(self, index);
            }
        }
        self.cursors.defer_collisions(false);
        self.finish_operation();
    }

    pub(crate) fn finish_operation(&mut self) {
        self.cursors.clamp_all(&self.buffer);
        self.cursors.yeet_duplicate_cursors();
        self.cursors.delete_disabled_cursors();
    }

    /// Delete cursor `index`'s selection and collapse it to the selection start.
    ///
    /// Cursors enclosed by the selection are disabled first. Returns `false` if the cursor
    /// had no selection.
    pub fn delete_selection(&mut self, index: usize) -> bool {
        let Some(cursor) = self.active(index) else {
            return false;
        };
        if !cursor.has_selection() {
            return false;
        }

        self.cursors.disable_intersections_in_selection(index);
        let shift = self
            .buffer
            .remove_range(cursor.selection_start, cursor.selection_end);
        self.place(index, cursor.selection_start);
        self.cursors.adjust_cursors(index, &shift);
        self.touch();
        true
    }

    fn insert_raw_at(&mut self, index: usize, text: &str) {
        let Some(cursor) = self.active(index) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let (shift, after) = self.buffer.insert_text(cursor.position, text);
        self.place(index, after);
        self.cursors.adjust_cursors(index, &shift);
        self.touch();
    }

    /// Type `text` at cursor `index`, replacing its selection.
    ///
    /// In [`CursorInputMode::Insert`] single-line text overwrites the characters after the
    /// caret.
    pub fn insert_text_at(&mut self, index: usize, text: &str) {
        self.delete_selection(index);
        let Some(cursor) = self.active(index) else {
            return;
        };

        if self.input_mode == CursorInputMode::Insert && !text.contains('\n') {
            let at = self.buffer.clamp(cursor.position);
            let count = text
                .chars()
                .count()
                .min(self.buffer.line_len(at.y).saturating_sub(at.x));
            if count > 0 {
                let shift = self
                    .buffer
                    .remove_range(at, Coordinate::new(at.x + count, at.y));
                self.cursors.adjust_cursors(index, &shift);
                self.touch();
            }
        }

        self.insert_raw_at(index, text);
    }

    /// Type one character at cursor `index`.
    pub fn insert_char_at(&mut self, index: usize, ch: char) {
        let mut buf = [0; 4];
        self.insert_text_at(index, ch.encode_utf8(&mut buf));
    }

    /// Split the line at cursor `index`, optionally carrying the line's indentation over.
    pub fn enter_at(&mut self, index: usize) {
        self.delete_selection(index);
        let Some(cursor) = self.active(index) else {
            return;
        };

        let mut text = String::from("\n");
        if self.config.auto_indent {
            let at = self.buffer.clamp(cursor.position);
            let indent: String = self
                .buffer
                .leading_whitespace(at.y)
                .chars()
                .take(at.x)
                .collect();
            text.push_str(&indent);
        }
        self.insert_raw_at(index, &text);
    }

    /// Delete the character before cursor `index` (or its selection).
    ///
    /// At the start of a line the line is joined onto the previous one, but only when
    /// `delete_line` is set.
    pub fn backspace_at(&mut self, index: usize, delete_line: bool) {
        if self.delete_selection(index) {
            return;
        }
        let Some(cursor) = self.active(index) else {
            return;
        };
        let at = self.buffer.clamp(cursor.position);

        let (shift, landing) = if at.x > 0 {
            let start = Coordinate::new(at.x - 1, at.y);
            (self.buffer.remove_range(start, at), start)
        } else if at.y > 0 && delete_line {
            let landing = Coordinate::new(self.buffer.line_len(at.y - 1), at.y - 1);
            match self.buffer.join_with_next(at.y - 1) {
                Some(shift) => (shift, landing),
                None => return,
            }
        } else {
            return;
        };

        self.place(index, landing);
        self.cursors.adjust_cursors(index, &shift);
        self.touch();
    }

    /// Delete the character after cursor `index` (or its selection).
    ///
    /// At the end of a line the next line is joined on, but only when `delete_line` is set.
    pub fn delete_at(&mut self, index: usize, delete_line: bool) {
        if self.delete_selection(index) {
            return;
        }
        let Some(cursor) = self.active(index) else {
            return;
        };
        let at = self.buffer.clamp(cursor.position);

        let shift = if at.x < self.buffer.line_len(at.y) {
            self.buffer
                .remove_range(at, Coordinate::new(at.x + 1, at.y))
        } else if delete_line {
            match self.buffer.join_with_next(at.y) {
                Some(shift) => shift,
                None => return,
            }
        } else {
            return;
        };

        self.place(index, at);
        self.cursors.adjust_cursors(index, &shift);
        self.touch();
    }

    /// Tab handling for cursor `index`.
    ///
    /// Without `shift` and without a multi-line selection this types one indent unit.
    /// Otherwise every line touched by the cursor is indented (or unindented with `shift`).
    /// Lines listed in `done` are skipped and newly processed lines are added to it, so a
    /// line shared by several cursors is only indented once per key press.
    pub fn tab_at(&mut self, index: usize, shift: bool, done: &mut HashSet<usize>) {
        let Some(cursor) = self.active(index) else {
            return;
        };
        let multi_line =
            cursor.has_selection() && cursor.selection_start.y != cursor.selection_end.y;

        if !shift && !multi_line {
            let column = self
                .buffer
                .display_column(cursor.selection_start, self.config.tab_width);
            let unit = self.config.indent_unit(column);
            self.delete_selection(index);
            self.insert_raw_at(index, &unit);
            return;
        }

        let first = cursor.selection_start.y;
        let mut last = cursor.selection_end.y;
        if multi_line && cursor.selection_end.x == 0 {
            last -= 1;
        }

        for y in first..=last {
            if !done.insert(y) {
                continue;
            }
            let line_shift = if shift {
                self.unindent_line(y)
            } else {
                let unit = self.config.indent_unit(0);
                Some(self.buffer.insert_text(Coordinate::line_start(y), &unit).0)
            };
            if let Some(line_shift) = line_shift {
                self.cursors.adjust_all(&line_shift);
                self.touch();
            }
        }
    }

    fn unindent_line(&mut self, y: usize) -> Option<LineShift> {
        let leading = self.buffer.leading_whitespace(y);
        let count = if leading.starts_with('\t') {
            1
        } else {
            leading
                .chars()
                .take_while(|&ch| ch == ' ')
                .take(self.config.tab_width.max(1))
                .count()
        };
        (count > 0).then(|| {
            self.buffer
                .remove_range(Coordinate::line_start(y), Coordinate::new(count, y))
        })
    }

    /// Type a character at every cursor.
    pub fn insert_char(&mut self, ch: char) {
        self.cursors.prepare_box_mode_for_input();
        self.broadcast(|doc, index| doc.insert_char_at(index, ch));
    }

    /// Type text at every cursor.
    pub fn insert_text(&mut self, text: &str) {
        self.cursors.prepare_box_mode_for_input();
        self.broadcast(|doc, index| doc.insert_text_at(index, text));
    }

    /// Enter at every cursor.
    pub fn enter(&mut self) {
        self.cursors.prepare_box_mode_for_input();
        self.broadcast(Self::enter_at);
    }

    /// Backspace at every cursor. Column (box) editing never joins lines.
    pub fn backspace(&mut self) {
        let delete_line = self.cursors.mode() != MultiCursorMode::Box;
        self.cursors.prepare_box_mode_for_input();
        self.broadcast(|doc, index| doc.backspace_at(index, delete_line));
    }

    /// Delete at every cursor. Column (box) editing never joins lines.
    pub fn delete(&mut self) {
        let delete_line = self.cursors.mode() != MultiCursorMode::Box;
        self.cursors.prepare_box_mode_for_input();
        self.broadcast(|doc, index| doc.delete_at(index, delete_line));
    }

    /// Tab (or Shift+Tab) at every cursor.
    pub fn tab(&mut self, shift: bool) {
        self.cursors.prepare_box_mode_for_input();
        let mut done = HashSet::new();
        self.broadcast(|doc, index| doc.tab_at(index, shift, &mut done));
    }

    /// Move every line holding a cursor (or part of a selection) one line up or down.
    ///
    /// Nothing happens if any of those lines is already at the buffer edge in that
    /// direction. Returns `true` if lines were swapped.
    pub fn swap_lines(&mut self, up: bool) -> bool {
        let mut lines = BTreeSet::new();
        for cursor in self.cursors.cursors().iter().filter(|c| !c.disabled) {
            if !cursor.has_selection() {
                lines.insert(cursor.position.y);
                continue;
            }
            let (start, end) = (cursor.selection_start, cursor.selection_end);
            let last = if end.x == 0 && end.y > start.y {
                end.y - 1
            } else {
                end.y
            };
            lines.extend(start.y..=last);
        }

        let last_line = self.buffer.line_count() - 1;
        let (Some(&top), Some(&bottom)) = (lines.first(), lines.last()) else {
            return false;
        };
        if (up && top == 0) || (!up && bottom >= last_line) {
            return false;
        }

        let order: Vec<usize> = if up {
            lines.into_iter().collect()
        } else {
            lines.into_iter().rev().collect()
        };
        for y in order {
            let other = if up { y - 1 } else { y + 1 };
            self.buffer.swap_lines(y, other);
            self.cursors.remap_lines(|line| {
                if line == y {
                    other
                } else if line == other {
                    y
                } else {
                    line
                }
            });
        }

        self.touch();
        self.finish_operation();
        true
    }

    /// Text a copy would place on the clipboard.
    ///
    /// Selections are joined with `'\n'` in position order. Without any selection, the full
    /// lines under the carets are copied, each followed by `'\n'`.
    pub fn copy(&self) -> String {
        let order = self.cursors.ordered_indices();
        if self.cursors.any_selection() {
            return order
                .iter()
                .filter_map(|&i| self.cursors.get(i))
                .filter(|c| c.has_selection())
                .map(|c| self.buffer.text_range(c.selection_start, c.selection_end))
                .collect::<Vec<_>>()
                .join("\n");
        }

        let lines: BTreeSet<usize> = order
            .iter()
            .filter_map(|&i| self.cursors.get(i))
            .map(|c| c.position.y)
            .collect();
        let mut out = String::new();
        for y in lines {
            out.push_str(&self.buffer.line_text(y));
            out.push('\n');
        }
        out
    }

    /// Copy, then remove what was copied.
    pub fn cut(&mut self) -> String {
        let text = self.copy();
        self.cursors.prepare_box_mode_for_input();

        if self.cursors.any_selection() {
            self.broadcast(|doc, index| {
                doc.delete_selection(index);
            });
            return text;
        }

        let lines: BTreeSet<usize> = self
            .cursors
            .cursors()
            .iter()
            .filter(|c| !c.disabled)
            .map(|c| c.position.y)
            .collect();
        for y in lines.into_iter().rev() {
            let shift = if y + 1 < self.buffer.line_count() {
                self.buffer
                    .remove_range(Coordinate::line_start(y), Coordinate::line_start(y + 1))
            } else if y > 0 {
                let prev_end = Coordinate::new(self.buffer.line_len(y - 1), y - 1);
                let end = Coordinate::new(self.buffer.line_len(y), y);
                self.buffer.remove_range(prev_end, end)
            } else {
                let end = Coordinate::new(self.buffer.line_len(0), 0);
                self.buffer.remove_range(Coordinate::line_start(0), end)
            };
            self.cursors.adjust_all(&shift);
        }

        self.touch();
        self.finish_operation();
        text
    }

    /// Paste clipboard text at every cursor.
    ///
    /// With more than one cursor and exactly as many newline-separated segments as cursors,
    /// each cursor receives its own segment (in position order). A single trailing newline,
    /// as left by a whole-line [`Document::copy`], does not count as a segment. Otherwise
    /// every cursor receives the whole text.
    pub fn paste(&mut self, text: &str) {
        self.cursors.prepare_box_mode_for_input();
        let body = text.strip_suffix('\n').unwrap_or(text);
        let segments: Vec<&str> = body.split('\n').collect();
        let order = self.cursors.ordered_indices();

        if order.len() > 1 && segments.len() == order.len() {
            let mut per_cursor: HashMap<usize, &str> = order.into_iter().zip(segments).collect();
            self.broadcast(|doc, index| {
                let segment = per_cursor.remove(&index).unwrap_or_default();
                doc.delete_selection(index);
                doc.insert_raw_at(index, segment.strip_suffix('\r').unwrap_or(segment));
            });
        } else {
            self.broadcast(|doc, index| {
                doc.delete_selection(index);
                doc.insert_raw_at(index, text);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Document {
        Document::new(text, EditorConfig::default())
    }

    fn lines(doc: &Document) -> Vec<String> {
        (0..doc.buffer().line_count())
            .map(|y| doc.line_text(y))
            .collect()
    }

    fn carets(doc: &mut Document, positions: &[(usize, usize)]) {
        doc.cursors_mut().set_all(
            positions
                .iter()
                .map(|&(x, y)| Cursor::at(Coordinate::new(x, y)))
                .collect(),
        );
    }

    fn positions(doc: &Document) -> Vec<Coordinate> {
        doc.cursors().cursors().iter().map(|c| c.position).collect()
    }

    #[test]
    fn test_single_cursor_insert_leaves_other_line_alone() {
        let mut d = doc("ab\ncd");
        carets(&mut d, &[(2, 0), (2, 1)]);
        d.insert_char_at(0, 'X');
        assert_eq!(lines(&d), vec!["abX", "cd"]);
        assert_eq!(positions(&d), vec![Coordinate::new(3, 0), Coordinate::new(2, 1)]);
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut d = doc("abc");
        d.cursors_mut()
            .get_mut(0)
            .unwrap()
            .select_from(Coordinate::new(0, 0), Coordinate::new(2, 0));
        d.insert_char('Z');
        assert_eq!(lines(&d), vec!["Zc"]);
        assert_eq!(positions(&d), vec![Coordinate::new(1, 0)]);
        assert!(!d.cursors().primary().has_selection());
    }

    #[test]
    fn test_broadcast_insert_on_same_line() {
        let mut d = doc("aaaa");
        carets(&mut d, &[(3, 0), (1, 0)]);
        d.insert_text("xy");
        assert_eq!(lines(&d), vec!["axyaaxya"]);
        assert_eq!(positions(&d), vec![Coordinate::new(7, 0), Coordinate::new(3, 0)]);
    }

    #[test]
    fn test_enter_with_auto_indent_shifts_following_cursors() {
        let mut d = doc("\tfoo(bar)\nnext");
        carets(&mut d, &[(5, 0), (2, 1)]);
        d.enter_at(0);
        assert_eq!(lines(&d), vec!["\tfoo(", "\tbar)", "next"]);
        assert_eq!(positions(&d), vec![Coordinate::new(1, 1), Coordinate::new(2, 2)]);
    }

    #[test]
    fn test_backspace_joins_lines_and_translates_cursors() {
        let mut d = doc("abc\ndef\nghi");
        carets(&mut d, &[(0, 1), (2, 1), (1, 2)]);
        d.backspace_at(0, true);
        assert_eq!(lines(&d), vec!["abcdef", "ghi"]);
        assert_eq!(
            positions(&d),
            vec![
                Coordinate::new(3, 0),
                Coordinate::new(5, 0),
                Coordinate::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_backspace_without_delete_line_stops_at_column_zero() {
        let mut d = doc("abc\ndef");
        carets(&mut d, &[(0, 1)]);
        d.backspace_at(0, false);
        assert_eq!(lines(&d), vec!["abc", "def"]);
    }

    #[test]
    fn test_broadcast_backspace_merges_colliding_cursors() {
        let mut d = doc("abcd");
        carets(&mut d, &[(1, 0), (2, 0)]);
        d.backspace();
        d.backspace();
        assert_eq!(lines(&d), vec!["cd"]);
        assert_eq!(positions(&d), vec![Coordinate::new(0, 0)]);
    }

    #[test]
    fn test_broadcast_result_ignores_cursor_insertion_order() {
        for order in [[(1, 0), (2, 0)], [(2, 0), (1, 0)]] {
            let mut d = doc("abcd");
            carets(&mut d, &order);
            d.delete();
            assert_eq!(lines(&d), vec!["ad"], "carets added as {order:?}");
            assert_eq!(positions(&d), vec![Coordinate::new(1, 0)]);

            let mut d = doc("abcd");
            carets(&mut d, &order);
            d.set_input_mode(CursorInputMode::Insert);
            d.insert_char('X');
            assert_eq!(lines(&d), vec!["aXXd"], "carets added as {order:?}");
        }
    }

    #[test]
    fn test_delete_at_line_end_joins_next() {
        let mut d = doc("ab\ncd\nef");
        carets(&mut d, &[(2, 0), (1, 1)]);
        d.delete();
        // The second caret follows the join onto line 0 and then deletes the 'd'.
        assert_eq!(lines(&d), vec!["abc", "ef"]);
        assert_eq!(positions(&d), vec![Coordinate::new(2, 0), Coordinate::new(3, 0)]);
    }

    #[test]
    fn test_overwrite_mode() {
        let mut d = doc("abcd");
        carets(&mut d, &[(1, 0)]);
        d.set_input_mode(CursorInputMode::Insert);
        d.insert_text("XY");
        assert_eq!(lines(&d), vec!["aXYd"]);
        d.insert_text("123");
        assert_eq!(lines(&d), vec!["aXY123"]);
    }

    #[test]
    fn test_tab_indents_and_unindents_selected_lines() {
        let mut d = doc("a\nb\nc");
        d.cursors_mut()
            .get_mut(0)
            .unwrap()
            .select_from(Coordinate::new(0, 0), Coordinate::new(1, 1));
        d.tab(false);
        assert_eq!(lines(&d), vec!["\ta", "\tb", "c"]);
        d.tab(true);
        assert_eq!(lines(&d), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tab_inserts_spaces_to_next_stop() {
        let mut d = Document::new(
            "ab",
            EditorConfig {
                tab_key_behavior: crate::TabKeyBehavior::Spaces,
                ..EditorConfig::default()
            },
        );
        carets(&mut d, &[(1, 0)]);
        d.tab(false);
        assert_eq!(lines(&d), vec!["a   b"]);
        assert_eq!(positions(&d), vec![Coordinate::new(4, 0)]);
    }

    #[test]
    fn test_swap_lines_moves_cursors_and_respects_edges() {
        let mut d = doc("one\ntwo\nthree");
        carets(&mut d, &[(1, 1)]);
        assert!(d.swap_lines(true));
        assert_eq!(lines(&d), vec!["two", "one", "three"]);
        assert_eq!(positions(&d), vec![Coordinate::new(1, 0)]);
        assert!(!d.swap_lines(true));
        assert_eq!(lines(&d), vec!["two", "one", "three"]);

        carets(&mut d, &[(0, 1), (0, 2)]);
        assert!(!d.swap_lines(false));
        assert!(d.swap_lines(true));
        assert_eq!(lines(&d), vec!["one", "three", "two"]);
    }

    #[test]
    fn test_swap_lines_with_whole_line_selection() {
        let mut d = doc("a\nb\nc");
        d.select_line(0);
        assert!(d.swap_lines(false));
        assert_eq!(lines(&d), vec!["b", "a", "c"]);
        let cursor = d.cursors().primary();
        assert_eq!(cursor.selection_start, Coordinate::new(0, 1));
        assert_eq!(cursor.selection_end, Coordinate::new(0, 2));

        let mut d = doc("a\nb\nc");
        d.select_line(1);
        assert!(d.swap_lines(false));
        assert_eq!(lines(&d), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_column_paste_distributes_segments() {
        let mut d = doc("a\nb\nc");
        carets(&mut d, &[(1, 2), (1, 0), (1, 1)]);
        d.paste("1\n2\n3");
        assert_eq!(lines(&d), vec!["a1", "b2", "c3"]);
    }

    #[test]
    fn test_whole_line_copy_pastes_one_line_per_caret() {
        let mut d = doc("one\ntwo\nx\ny");
        carets(&mut d, &[(0, 0), (1, 1)]);
        let clipboard = d.copy();
        assert_eq!(clipboard, "one\ntwo\n");

        carets(&mut d, &[(1, 2), (1, 3)]);
        d.paste(&clipboard);
        assert_eq!(lines(&d), vec!["one", "two", "xone", "ytwo"]);
        assert_eq!(positions(&d), vec![Coordinate::new(4, 2), Coordinate::new(4, 3)]);
    }

    #[test]
    fn test_paste_full_text_when_counts_differ() {
        let mut d = doc("a\nb");
        carets(&mut d, &[(1, 0), (1, 1)]);
        d.paste("x\ny\nz");
        assert_eq!(lines(&d), vec!["ax", "y", "z", "bx", "y", "z"]);
    }

    #[test]
    fn test_copy_and_cut() {
        let mut d = doc("hello\nworld");
        d.cursors_mut()
            .get_mut(0)
            .unwrap()
            .select_from(Coordinate::new(1, 0), Coordinate::new(3, 1));
        assert_eq!(d.copy(), "ello\nwor");
        assert_eq!(d.cut(), "ello\nwor");
        assert_eq!(lines(&d), vec!["hld"]);

        carets(&mut d, &[(0, 0)]);
        assert_eq!(d.cut(), "hld\n");
        assert_eq!(lines(&d), vec![""]);
    }

    #[test]
    fn test_revision_tracks_text_changes() {
        let mut d = doc("abc");
        let before = d.revision();
        d.backspace();
        assert_eq!(d.revision(), before);
        d.insert_char('x');
        assert!(d.revision() > before);
    }
}
