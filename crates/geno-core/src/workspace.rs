//! Open files of an editor.
//!
//! A [`Workspace`] owns every [`FileSession`] of one editor instance and tracks which of them
//! is active. It is a plain value: hosts create one per editor window and pass it around
//! rather than reaching for a global.

use crate::buffer::{GlyphClassifier, PlainClassifier};
use crate::config::EditorConfig;
use crate::coordinate::Coordinate;
use crate::session::{FileSession, SessionError};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Opaque identifier for a session in a [`Workspace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Workspace-level errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// A session id was not found.
    #[error("session {0:?} not found")]
    SessionNotFound(SessionId),
    /// No open session uses this path.
    #[error("{} is not open", .0.display())]
    PathNotOpen(PathBuf),
    /// Another session already uses this path.
    #[error("{} is already open", .0.display())]
    PathAlreadyOpen(PathBuf),
    /// The operation needs an active session.
    #[error("no active session")]
    NoActiveSession,
    /// Loading or saving a session failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// What was dropped onto the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    /// Files from the platform file manager.
    Files(Vec<PathBuf>),
    /// Dragged text.
    Text(String),
}

/// The open sessions of one editor.
pub struct Workspace {
    config: EditorConfig,
    classifier: Arc<dyn GlyphClassifier>,
    next_session_id: u64,
    sessions: BTreeMap<SessionId, FileSession>,
    path_to_session: HashMap<PathBuf, SessionId>,
    active: Option<SessionId>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("session_count", &self.sessions.len())
            .field("path_count", &self.path_to_session.len())
            .field("active", &self.active)
            .finish()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Workspace {
    /// Create an empty workspace whose sessions use `config`.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            classifier: Arc::new(PlainClassifier),
            next_session_id: 0,
            sessions: BTreeMap::new(),
            path_to_session: HashMap::new(),
            active: None,
        }
    }

    /// Use `classifier` for every open and future session.
    pub fn set_classifier(&mut self, classifier: Arc<dyn GlyphClassifier>) {
        for session in self.sessions.values_mut() {
            session.set_classifier(Arc::clone(&classifier));
        }
        self.classifier = classifier;
    }

    /// Settings handed to new sessions.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Returns the number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if there are no open sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of all open sessions, oldest first.
    pub fn session_ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.keys().copied()
    }

    /// The active session id (if any).
    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    /// Path of the active session (if it has one).
    pub fn active_path(&self) -> Option<&Path> {
        self.sessions.get(&self.active?)?.path()
    }

    /// Make `id` the active session.
    pub fn set_active(&mut self, id: SessionId) -> Result<(), WorkspaceError> {
        if !self.sessions.contains_key(&id) {
            return Err(WorkspaceError::SessionNotFound(id));
        }
        self.active = Some(id);
        Ok(())
    }

    /// Look up a session by path.
    pub fn session_id_for_path(&self, path: &Path) -> Option<SessionId> {
        self.path_to_session.get(path).copied()
    }

    /// A session by id.
    pub fn session(&self, id: SessionId) -> Option<&FileSession> {
        self.sessions.get(&id)
    }

    /// A session by id, mutably.
    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut FileSession> {
        self.sessions.get_mut(&id)
    }

    /// The active session, mutably.
    pub fn active_session_mut(&mut self) -> Option<&mut FileSession> {
        self.sessions.get_mut(&self.active?)
    }

    fn insert(&mut self, mut session: FileSession) -> SessionId {
        session.set_classifier(Arc::clone(&self.classifier));
        let id = SessionId(self.next_session_id);
        self.next_session_id = self.next_session_id.saturating_add(1);
        if let Some(path) = session.path() {
            self.path_to_session.insert(path.to_path_buf(), id);
        }
        self.sessions.insert(id, session);
        self.active = Some(id);
        id
    }

    /// Open `path`, or focus it if it is already open. The opened session becomes active.
    pub fn open_file(&mut self, path: impl Into<PathBuf>) -> Result<SessionId, WorkspaceError> {
        let path = path.into();
        if let Some(id) = self.session_id_for_path(&path) {
            self.active = Some(id);
            return Ok(id);
        }
        let session = FileSession::open(path, self.config.clone())?;
        Ok(self.insert(session))
    }

    /// Create an unsaved session holding `text`. It becomes active.
    pub fn new_file(&mut self, text: &str) -> SessionId {
        self.insert(FileSession::from_text(text, self.config.clone()))
    }

    /// Close a session, stopping and joining its search.
    pub fn close_file(&mut self, id: SessionId) -> Result<(), WorkspaceError> {
        let Some(mut session) = self.sessions.remove(&id) else {
            return Err(WorkspaceError::SessionNotFound(id));
        };
        session.close();
        if let Some(path) = session.path() {
            self.path_to_session.remove(path);
            debug!(path = %path.display(), "closed file");
        }
        if self.active == Some(id) {
            self.active = self.sessions.keys().next_back().copied();
        }
        Ok(())
    }

    /// Save a session to its path.
    pub fn save_file(&mut self, id: SessionId) -> Result<(), WorkspaceError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(WorkspaceError::SessionNotFound(id))?;
        session.save()?;
        Ok(())
    }

    /// Save a session to `path`, which becomes its new path.
    pub fn save_file_as(
        &mut self,
        id: SessionId,
        path: impl Into<PathBuf>,
    ) -> Result<(), WorkspaceError> {
        let path = path.into();
        if self
            .session_id_for_path(&path)
            .is_some_and(|other| other != id)
        {
            return Err(WorkspaceError::PathAlreadyOpen(path));
        }
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(WorkspaceError::SessionNotFound(id))?;
        let previous = session.path().map(Path::to_path_buf);
        session.save_as(path.clone())?;
        if let Some(previous) = previous {
            self.path_to_session.remove(&previous);
        }
        self.path_to_session.insert(path, id);
        Ok(())
    }

    /// Record that the file at `old` was renamed to `new`. Nothing is read or written.
    pub fn replace_file(
        &mut self,
        old: &Path,
        new: impl Into<PathBuf>,
    ) -> Result<SessionId, WorkspaceError> {
        let new = new.into();
        let id = self
            .session_id_for_path(old)
            .ok_or_else(|| WorkspaceError::PathNotOpen(old.to_path_buf()))?;
        if self.path_to_session.contains_key(&new) {
            return Err(WorkspaceError::PathAlreadyOpen(new));
        }
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(WorkspaceError::SessionNotFound(id))?;
        session.set_path(new.clone());
        self.path_to_session.remove(old);
        self.path_to_session.insert(new, id);
        Ok(id)
    }

    /// Handle a drop at `(line, column)` of the active session.
    ///
    /// Dropped files are opened (the last one ends up active). Dropped text is inserted at
    /// the drop point, clamped to the buffer. Returns the sessions that were touched.
    pub fn on_drag_drop(
        &mut self,
        payload: DropPayload,
        line: usize,
        column: usize,
    ) -> Result<Vec<SessionId>, WorkspaceError> {
        match payload {
            DropPayload::Files(paths) => paths
                .into_iter()
                .map(|path| self.open_file(path))
                .collect(),
            DropPayload::Text(text) => {
                let id = self.active.ok_or(WorkspaceError::NoActiveSession)?;
                let session = self
                    .sessions
                    .get_mut(&id)
                    .ok_or(WorkspaceError::SessionNotFound(id))?;
                session.edit(|doc| {
                    doc.set_cursor(Coordinate::new(column, line));
                    doc.insert_text(&text);
                });
                Ok(vec![id])
            }
        }
    }
}
