//! Styled characters and the palette used to resolve their colors.

/// Cached classification of a glyph.
///
/// The kind is derived from the surrounding text (keywords, literals, comments) and becomes
/// invalid as soon as its line changes; see [`crate::Line::is_stale`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GlyphKind {
    /// Plain text.
    #[default]
    Default,
    /// Language keyword.
    Keyword,
    /// Numeric literal.
    Number,
    /// String or character literal.
    String,
    /// Line or block comment.
    Comment,
}

/// One character together with its resolved style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// The character.
    pub ch: char,
    /// Cached classification.
    pub kind: GlyphKind,
}

impl Glyph {
    /// Create an unclassified glyph.
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            kind: GlyphKind::Default,
        }
    }

    /// Create a glyph with an explicit kind.
    pub const fn with_kind(ch: char, kind: GlyphKind) -> Self {
        Self { ch, kind }
    }
}

/// Colors (packed `0xAABBGGRR`) used by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Plain text.
    pub default: u32,
    /// Keywords.
    pub keyword: u32,
    /// Numeric literals.
    pub number: u32,
    /// String literals.
    pub string: u32,
    /// Comments.
    pub comment: u32,
    /// Line number gutter.
    pub line_number: u32,
    /// Caret in normal input mode.
    pub cursor: u32,
    /// Caret in overwrite mode.
    pub cursor_insert: u32,
    /// Selection background.
    pub selection: u32,
    /// Search match background.
    pub search_highlight: u32,
    /// Background of the active search match.
    pub search_active: u32,
    /// Current line background.
    pub current_line: u32,
    /// Current line background while unfocused.
    pub current_line_inactive: u32,
    /// Current line border.
    pub current_line_edge: u32,
}

impl Palette {
    /// Resolve the color of a glyph kind.
    pub fn color_of(&self, kind: GlyphKind) -> u32 {
        match kind {
            GlyphKind::Default => self.default,
            GlyphKind::Keyword => self.keyword,
            GlyphKind::Number => self.number,
            GlyphKind::String => self.string,
            GlyphKind::Comment => self.comment,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default: 0xffe0e0e0,
            keyword: 0xffd69c56,
            number: 0xffa8ceb5,
            string: 0xff7891ce,
            comment: 0xff55996a,
            line_number: 0xff858585,
            cursor: 0xffe0e0e0,
            cursor_insert: 0x80e0e0e0,
            selection: 0x80a06020,
            search_highlight: 0x40c8c8c8,
            search_active: 0x80c8c8c8,
            current_line: 0x10ffffff,
            current_line_inactive: 0x08ffffff,
            current_line_edge: 0x20ffffff,
        }
    }
}
