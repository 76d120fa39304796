#![warn(missing_docs)]
//! Geno Core - Headless Multi-Cursor Text Editing Kernel
//!
//! # Overview
//!
//! `geno-core` is the editing engine behind the Geno IDE's text editor, without any GUI.
//! It owns the state a text widget needs (lines, cursors, selections, search results) and
//! leaves drawing, input dispatch and windowing to the host.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Workspace (open files, drag and drop)      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  FileSession (load/save, dirty, search)     │
//! ├─────────────────────────────────────────────┤
//! │  Document (edit + movement broadcasts)      │  ← Editing
//! ├─────────────────────────────────────────────┤
//! │  CursorSet (multi-cursor, box selection)    │
//! ├─────────────────────────────────────────────┤
//! │  LineBuffer (lines of styled glyphs)        │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use geno_core::{Coordinate, Document, EditorConfig};
//!
//! let mut doc = Document::new("ab\ncd", EditorConfig::default());
//!
//! // Two carets, one per line.
//! doc.set_cursor(Coordinate::new(2, 0));
//! doc.add_cursor(Coordinate::new(2, 1));
//!
//! // Typing is broadcast to every caret.
//! doc.insert_char('!');
//! assert_eq!(doc.text(), "ab!\ncd!");
//! ```
//!
//! ## Searching
//!
//! ```rust
//! use geno_core::{EditorConfig, FileSession};
//!
//! let mut session = FileSession::from_text("foo\nFOO\nbarfoo\n", EditorConfig::default());
//! session.start_search("foo", false, false).unwrap();
//! session.wait_for_search();
//! assert_eq!(session.search_results().len(), 3);
//! ```
//!
//! # Module Description
//!
//! - [`coordinate`] - coordinates and the shifts edits apply to them
//! - [`buffer`] - line buffer of styled glyphs
//! - [`cursor`] / [`cursor_set`] - cursors, collision resolution and box selection
//! - [`edit`] - the [`Document`] and its broadcast edit operations
//! - [`search`] - cancellable background search with 1000-line result groups
//! - [`session`] / [`workspace`] - open files
//! - [`config`] - editor settings
//!
//! # Logging
//!
//! The crate emits `tracing` events (file IO, search lifecycle) and never installs a
//! subscriber.

pub mod buffer;
pub mod config;
pub mod coordinate;
pub mod cursor;
pub mod cursor_set;
pub mod edit;
pub mod glyph;
pub mod line_ending;
mod movement;
pub mod search;
pub mod session;
pub mod workspace;

pub use buffer::{GlyphClassifier, Line, LineBuffer, PlainClassifier, is_word_char};
pub use config::{ConfigError, EditorConfig, TabKeyBehavior};
pub use coordinate::{Coordinate, LineShift};
pub use cursor::{BoxModeDirection, Cursor, CursorInputMode, MultiCursorMode};
pub use cursor_set::CursorSet;
pub use edit::Document;
pub use glyph::{Glyph, GlyphKind, Palette};
pub use line_ending::LineEnding;
pub use search::{
    GROUP_SIZE, SearchError, SearchInstance, SearchMatch, SearchOptions, SearchResultGroups,
    SearchState,
};
pub use session::{FileSession, SearchRequest, SessionError};
pub use workspace::{DropPayload, SessionId, Workspace, WorkspaceError};
