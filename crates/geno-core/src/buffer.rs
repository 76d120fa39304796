//! Line buffer.
//!
//! A [`LineBuffer`] is the editable representation of a file: an ordered list of [`Line`]s,
//! each an ordered list of [`Glyph`]s. Every structural edit returns a [`LineShift`] so the
//! caller can translate the coordinates of all other cursors.
//!
//! The flat text of a file is only derived on demand ([`LineBuffer::to_text`]); while
//! editing, the line list is authoritative.

use crate::coordinate::{Coordinate, LineShift};
use crate::glyph::{Glyph, GlyphKind};
use std::sync::Arc;
use unicode_width::UnicodeWidthChar;

/// A single line of styled characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    glyphs: Vec<Glyph>,
    stale: bool,
}

impl Line {
    /// Build an unclassified line from text (which must not contain `'\n'`).
    pub fn from_text(text: &str) -> Self {
        Self {
            glyphs: text.chars().map(Glyph::new).collect(),
            stale: true,
        }
    }

    /// Number of characters in the line.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Returns `true` if the line has no characters.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The glyphs of this line.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// The plain text of this line.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }

    /// Text of the character range `[start, end)`, clamped to the line.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.glyphs.len());
        let start = start.min(end);
        self.glyphs[start..end].iter().map(|g| g.ch).collect()
    }

    /// Returns `true` if the cached glyph kinds no longer reflect the text.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    fn touch(&mut self) -> &mut Vec<Glyph> {
        self.stale = true;
        &mut self.glyphs
    }
}

/// Classifies the characters of a line into [`GlyphKind`]s.
///
/// Implementations return one kind per `char` of `text`; missing trailing entries are
/// treated as [`GlyphKind::Default`].
pub trait GlyphClassifier: Send + Sync {
    /// Classify a single line.
    fn classify_line(&self, text: &str) -> Vec<GlyphKind>;
}

/// A classifier that leaves every glyph as [`GlyphKind::Default`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainClassifier;

impl GlyphClassifier for PlainClassifier {
    fn classify_line(&self, _text: &str) -> Vec<GlyphKind> {
        Vec::new()
    }
}

/// Split text into lines on `'\n'`, dropping a `'\r'` that precedes it.
///
/// `N` newlines always produce `N + 1` lines, so a trailing newline yields a trailing empty
/// line.
pub fn split_lines(text: &str) -> Vec<Line> {
    text.split('\n')
        .map(|line| Line::from_text(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Join lines back into LF-separated text. Inverse of [`split_lines`].
pub fn join_lines(lines: &[Line]) -> String {
    let capacity = lines.iter().map(|l| l.len() + 1).sum();
    let mut out = String::with_capacity(capacity);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.extend(line.glyphs.iter().map(|g| g.ch));
    }
    out
}

/// Returns `true` for characters that can be part of an identifier.
pub fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// Ordered lines of a file. Always holds at least one (possibly empty) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<Line>,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    /// An empty buffer (one empty line).
    pub fn new() -> Self {
        Self {
            lines: vec![Line::default()],
        }
    }

    /// Build a buffer from flat text.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines(text),
        }
    }

    /// Derive the flat LF-separated text.
    pub fn to_text(&self) -> String {
        join_lines(&self.lines)
    }

    /// All lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of lines (at least 1).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// A line by index.
    pub fn line(&self, y: usize) -> Option<&Line> {
        self.lines.get(y)
    }

    /// Length of line `y` in characters (0 for out-of-range lines).
    pub fn line_len(&self, y: usize) -> usize {
        self.lines.get(y).map_or(0, Line::len)
    }

    /// Plain text of line `y` (empty for out-of-range lines).
    pub fn line_text(&self, y: usize) -> String {
        self.lines.get(y).map(Line::text).unwrap_or_default()
    }

    /// The character at `c`, if any.
    pub fn char_at(&self, c: Coordinate) -> Option<char> {
        self.lines.get(c.y)?.glyphs.get(c.x).map(|g| g.ch)
    }

    /// Coordinate just past the last character of the buffer.
    pub fn end(&self) -> Coordinate {
        let y = self.lines.len() - 1;
        Coordinate::new(self.line_len(y), y)
    }

    /// Clamp a coordinate to the nearest valid buffer location.
    pub fn clamp(&self, c: Coordinate) -> Coordinate {
        let y = c.y.min(self.lines.len() - 1);
        Coordinate::new(c.x.min(self.line_len(y)), y)
    }

    /// Text between two coordinates (order-insensitive), joined with `'\n'`.
    pub fn text_range(&self, a: Coordinate, b: Coordinate) -> String {
        let (start, end) = ordered(self.clamp(a), self.clamp(b));
        if start.y == end.y {
            return self.lines[start.y].slice(start.x, end.x);
        }

        let mut out = self.lines[start.y].slice(start.x, usize::MAX);
        for y in start.y + 1..end.y {
            out.push('\n');
            out.push_str(&self.lines[y].text());
        }
        out.push('\n');
        out.push_str(&self.lines[end.y].slice(0, end.x));
        out
    }

    /// Insert `text` at `at` (clamped). `'\r'` characters are dropped.
    ///
    /// Returns the shift for coordinates at or after the insertion point, and the
    /// coordinate just past the inserted text.
    pub fn insert_text(&mut self, at: Coordinate, text: &str) -> (LineShift, Coordinate) {
        let at = self.clamp(at);
        let mut segments = text.split('\n').map(|s| {
            s.chars()
                .filter(|&ch| ch != '\r')
                .map(Glyph::new)
                .collect::<Vec<_>>()
        });

        let first = segments.next().unwrap_or_default();
        let rest: Vec<Vec<Glyph>> = segments.collect();

        if rest.is_empty() {
            let len = first.len();
            let line = self.lines[at.y].touch();
            let tail = line.split_off(at.x);
            line.extend(first);
            line.extend(tail);
            let after = Coordinate::new(at.x + len, at.y);
            return (LineShift::insertion(at, after), after);
        }

        let tail = {
            let line = self.lines[at.y].touch();
            let tail = line.split_off(at.x);
            line.extend(first);
            tail
        };

        let count = rest.len();
        let last_len = rest.last().map_or(0, Vec::len);
        let mut new_lines: Vec<Line> = rest
            .into_iter()
            .map(|glyphs| Line {
                glyphs,
                stale: true,
            })
            .collect();
        if let Some(last) = new_lines.last_mut() {
            last.glyphs.extend(tail);
        }

        let following = self.lines.split_off(at.y + 1);
        self.lines.extend(new_lines);
        self.lines.extend(following);

        let after = Coordinate::new(last_len, at.y + count);
        (LineShift::insertion(at, after), after)
    }

    /// Remove the text between two coordinates (order-insensitive, clamped).
    pub fn remove_range(&mut self, a: Coordinate, b: Coordinate) -> LineShift {
        let (start, end) = ordered(self.clamp(a), self.clamp(b));
        if start == end {
            return LineShift::none(start);
        }

        if start.y == end.y {
            self.lines[start.y].touch().drain(start.x..end.x);
        } else {
            let tail: Vec<Glyph> = self.lines[end.y].glyphs[end.x..].to_vec();
            let line = self.lines[start.y].touch();
            line.truncate(start.x);
            line.extend(tail);
            self.lines.drain(start.y + 1..=end.y);
        }

        LineShift::removal(start, end)
    }

    /// Split line `at.y` at column `at.x`.
    pub fn split_line(&mut self, at: Coordinate) -> LineShift {
        self.insert_text(at, "\n").0
    }

    /// Append line `y + 1` to line `y`. Returns `None` for the last line.
    pub fn join_with_next(&mut self, y: usize) -> Option<LineShift> {
        if y + 1 >= self.lines.len() {
            return None;
        }
        let end_of_line = Coordinate::new(self.line_len(y), y);
        Some(self.remove_range(end_of_line, Coordinate::line_start(y + 1)))
    }

    /// Exchange two lines. Out-of-range indices are ignored.
    pub fn swap_lines(&mut self, a: usize, b: usize) {
        if a == b || a >= self.lines.len() || b >= self.lines.len() {
            return;
        }
        self.lines.swap(a, b);
        self.lines[a].stale = true;
        self.lines[b].stale = true;
    }

    /// Leading spaces and tabs of line `y`.
    pub fn leading_whitespace(&self, y: usize) -> String {
        self.lines
            .get(y)
            .map(|line| {
                line.glyphs
                    .iter()
                    .map(|g| g.ch)
                    .take_while(|&ch| ch == ' ' || ch == '\t')
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The word under (or directly before) `c`, with its start and end coordinates.
    pub fn word_at(&self, c: Coordinate) -> Option<(String, Coordinate, Coordinate)> {
        let c = self.clamp(c);
        let glyphs = &self.lines[c.y].glyphs;

        let anchor = if glyphs.get(c.x).is_some_and(|g| is_word_char(g.ch)) {
            c.x
        } else if c.x > 0 && is_word_char(glyphs[c.x - 1].ch) {
            c.x - 1
        } else {
            return None;
        };

        let mut start = anchor;
        while start > 0 && is_word_char(glyphs[start - 1].ch) {
            start -= 1;
        }
        let mut end = anchor + 1;
        while end < glyphs.len() && is_word_char(glyphs[end].ch) {
            end += 1;
        }

        let word = glyphs[start..end].iter().map(|g| g.ch).collect();
        Some((word, Coordinate::new(start, c.y), Coordinate::new(end, c.y)))
    }

    /// Mark every line stale so the next recolor reclassifies the whole buffer.
    pub fn invalidate(&mut self) {
        for line in &mut self.lines {
            line.stale = true;
        }
    }

    /// Reclassify every stale line. Returns the number of lines recolored.
    pub fn recolor(&mut self, classifier: &dyn GlyphClassifier) -> usize {
        let mut count = 0;
        for line in self.lines.iter_mut().filter(|l| l.stale) {
            let kinds = classifier.classify_line(&line.text());
            for (i, glyph) in line.glyphs.iter_mut().enumerate() {
                glyph.kind = kinds.get(i).copied().unwrap_or_default();
            }
            line.stale = false;
            count += 1;
        }
        count
    }

    /// An immutable copy of every line's text, shared with background readers.
    pub fn snapshot(&self) -> Arc<[String]> {
        self.lines.iter().map(Line::text).collect()
    }

    /// Display column of `c`, expanding tabs to the next multiple of `tab_width` and
    /// counting wide characters as two cells.
    pub fn display_column(&self, c: Coordinate, tab_width: usize) -> usize {
        let c = self.clamp(c);
        let tab_width = tab_width.max(1);
        self.lines[c.y].glyphs[..c.x]
            .iter()
            .fold(0, |col, g| col + cell_width(g.ch, col, tab_width))
    }

    /// The character column whose display span contains `display` on line `y`.
    pub fn column_for_display(&self, y: usize, display: usize, tab_width: usize) -> usize {
        let y = y.min(self.lines.len() - 1);
        let tab_width = tab_width.max(1);
        let mut col = 0;
        for (x, g) in self.lines[y].glyphs.iter().enumerate() {
            let width = cell_width(g.ch, col, tab_width);
            if display < col + width {
                return x;
            }
            col += width;
        }
        self.lines[y].len()
    }
}

fn cell_width(ch: char, col: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        tab_width - col % tab_width
    } else {
        ch.width().unwrap_or(0)
    }
}

pub(crate) fn ordered(a: Coordinate, b: Coordinate) -> (Coordinate, Coordinate) {
    if a <= b { (a, b) } else { (b, a) }
}
