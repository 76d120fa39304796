//! Per-file editing sessions.
//!
//! A [`FileSession`] owns everything the editor keeps for one open file: the text blob read
//! from (and written to) disk, the [`Document`] derived from it, the detected line ending,
//! dirty tracking, and at most one [`SearchInstance`].
//!
//! The text blob and the document's lines are kept in sync explicitly:
//! [`FileSession::split_lines`] rebuilds the lines from the blob and
//! [`FileSession::join_lines`] rebuilds the blob from the lines.

use crate::buffer::{GlyphClassifier, PlainClassifier};
use crate::config::EditorConfig;
use crate::edit::Document;
use crate::line_ending::LineEnding;
use crate::search::{
    SearchError, SearchInstance, SearchMatch, SearchOptions, SearchResultGroups, SearchState,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Errors produced by [`FileSession`] IO and search.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the file failed.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The session has never been associated with a file.
    #[error("session has no file path")]
    NoPath,
    /// A search could not be started.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Term and options of the most recent search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// The searched term.
    pub term: String,
    /// Matching options.
    pub options: SearchOptions,
}

/// One open file.
pub struct FileSession {
    path: Option<PathBuf>,
    text: String,
    document: Document,
    line_ending: LineEnding,
    open: bool,
    changed: bool,
    classifier: Arc<dyn GlyphClassifier>,
    search: Option<SearchInstance>,
    last_search: Option<SearchRequest>,
}

impl std::fmt::Debug for FileSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSession")
            .field("path", &self.path)
            .field("line_count", &self.document.buffer().line_count())
            .field("line_ending", &self.line_ending)
            .field("open", &self.open)
            .field("changed", &self.changed)
            .field("search", &self.search.as_ref().map(SearchInstance::state))
            .finish()
    }
}

impl FileSession {
    /// An unsaved session holding `text`.
    pub fn from_text(text: &str, config: EditorConfig) -> Self {
        let mut session = Self {
            path: None,
            text: text.to_string(),
            document: Document::new("", config),
            line_ending: LineEnding::detect_in_text(text),
            open: true,
            changed: false,
            classifier: Arc::new(PlainClassifier),
            search: None,
            last_search: None,
        };
        session.split_lines();
        session
    }

    /// Read `path` from disk.
    pub fn open(path: impl Into<PathBuf>, config: EditorConfig) -> Result<Self, SessionError> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|source| SessionError::Io {
            path: path.clone(),
            source,
        })?;
        let mut session = Self::from_text(&text, config);
        debug!(
            path = %path.display(),
            lines = session.document.buffer().line_count(),
            line_ending = ?session.line_ending,
            "opened file"
        );
        session.path = Some(path);
        Ok(session)
    }

    /// The file this session reads from and saves to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Point the session at another file (used for renames). Does not touch the disk.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// The text blob as of the last load, save or [`FileSession::join_lines`].
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The editable document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns `true` until the session is closed.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `true` if the lines changed since the last load or save.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Line ending written on save.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Override the line ending written on save.
    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// Use `classifier` for glyph kinds and reclassify every line.
    pub fn set_classifier(&mut self, classifier: Arc<dyn GlyphClassifier>) {
        self.classifier = classifier;
        self.document.buffer.invalidate();
        self.document.buffer.recolor(self.classifier.as_ref());
    }

    /// Run an edit (or movement) against the document.
    ///
    /// If the text changed, the session is marked changed, stale lines are reclassified and
    /// a running or finished search is restarted on the new text. A search that was stopped
    /// stays stopped.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Document) -> R) -> R {
        let before = self.document.revision();
        let result = f(&mut self.document);
        if self.document.revision() != before {
            self.changed = true;
            self.document.buffer.recolor(self.classifier.as_ref());
            self.restart_search();
        }
        result
    }

    /// Rebuild the lines from the text blob.
    pub fn split_lines(&mut self) {
        self.document.replace_text(&self.text);
        self.document.buffer.recolor(self.classifier.as_ref());
    }

    /// Rebuild the text blob from the lines.
    pub fn join_lines(&mut self) {
        self.text = self.document.text();
    }

    /// Replace the whole file content, e.g. after it changed on disk.
    pub fn replace_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.split_lines();
        self.changed = true;
        self.restart_search();
    }

    /// Write the lines to the session's path using the detected line ending.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let path = self.path.clone().ok_or(SessionError::NoPath)?;
        self.save_as(path)
    }

    /// Write the lines to `path` and make it the session's path.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        let path = path.into();
        self.join_lines();
        let contents = self.line_ending.apply_to_text(&self.text);
        fs::write(&path, contents).map_err(|source| SessionError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "saved file");
        self.path = Some(path);
        self.changed = false;
        Ok(())
    }

    /// Start a background search, stopping and joining any previous one first.
    pub fn start_search(
        &mut self,
        term: &str,
        case_sensitive: bool,
        whole_word: bool,
    ) -> Result<(), SessionError> {
        let options = SearchOptions {
            case_sensitive,
            whole_word,
        };
        self.launch_search(term, options)?;
        self.last_search = Some(SearchRequest {
            term: term.to_string(),
            options,
        });
        Ok(())
    }

    fn launch_search(&mut self, term: &str, options: SearchOptions) -> Result<(), SessionError> {
        if let Some(mut previous) = self.search.take() {
            previous.stop_and_join();
        }
        let workers = self.document.config().search_workers;
        let snapshot = self.document.buffer().snapshot();
        self.search = Some(SearchInstance::start(snapshot, term, options, workers)?);
        Ok(())
    }

    fn restart_search(&mut self) {
        let live = matches!(
            self.search_state(),
            Some(SearchState::Running | SearchState::HasResult)
        );
        if !live {
            return;
        }
        let Some(request) = self.last_search.clone() else {
            return;
        };
        if let Err(err) = self.launch_search(&request.term, request.options) {
            warn!(%err, term = %request.term, "failed to restart search");
        }
    }

    /// Ask the current search to stop without waiting.
    pub fn stop_search(&mut self) {
        if let Some(search) = &self.search {
            search.stop();
        }
    }

    /// Stop the current search, wait until it has stopped and discard it.
    pub fn clear_search(&mut self) {
        if let Some(mut search) = self.search.take() {
            search.stop_and_join();
        }
        self.last_search = None;
    }

    /// Block until the current search finishes.
    pub fn wait_for_search(&mut self) -> Option<SearchState> {
        self.search.as_mut().map(SearchInstance::wait)
    }

    /// State of the current search, if any.
    pub fn search_state(&self) -> Option<SearchState> {
        self.search.as_ref().map(SearchInstance::state)
    }

    /// The most recent search request.
    pub fn last_search(&self) -> Option<&SearchRequest> {
        self.last_search.as_ref()
    }

    /// A copy of the current results. Empty until the search has finished.
    pub fn search_results(&self) -> SearchResultGroups {
        self.search
            .as_ref()
            .map(|s| s.with_results(SearchResultGroups::clone))
            .unwrap_or_default()
    }

    /// Matches in the result group that contains `line`.
    pub fn result_group(&self, line: usize) -> Vec<SearchMatch> {
        self.search
            .as_ref()
            .map(|s| s.with_results(|r| r.group(line).to_vec()))
            .unwrap_or_default()
    }

    /// Select the first match after the primary cursor, wrapping to the top.
    pub fn select_next_match(&mut self) -> Option<SearchMatch> {
        let from = self.document.cursors().primary().selection_end;
        let found = self.search.as_ref()?.with_results(|r| {
            r.first_at_or_after(from)
                .or_else(|| (!r.is_empty()).then_some(0))
                .map(|i| r[i])
        })?;
        self.document.set_selection(found.start, found.end);
        Some(found)
    }

    /// Select the last match before the primary cursor, wrapping to the bottom.
    pub fn select_prev_match(&mut self) -> Option<SearchMatch> {
        let from = self.document.cursors().primary().selection_start;
        let found = self.search.as_ref()?.with_results(|r| {
            r.last_before(from)
                .or_else(|| r.len().checked_sub(1))
                .map(|i| r[i])
        })?;
        self.document.set_selection(found.start, found.end);
        Some(found)
    }

    /// Stop any search and mark the session closed.
    pub fn close(&mut self) {
        self.clear_search();
        self.open = false;
    }
}
