//! Background search.
//!
//! A [`SearchInstance`] scans an immutable snapshot of a file's lines on worker threads.
//! The line range is split into contiguous chunks, one worker per chunk, each collecting
//! matches into its own buffer. A manager thread joins the workers in chunk order, so the
//! merged result is in line order no matter which worker finishes first, and publishes it as
//! [`SearchResultGroups`].
//!
//! Cancellation is cooperative: workers poll a [`CancellationToken`] before every line.
//!
//! Matching works on characters, not bytes: every [`SearchMatch`] coordinate is a character
//! column, like the rest of the crate.

use crate::buffer::is_word_char;
use crate::coordinate::Coordinate;
use parking_lot::{Condvar, Mutex};
use regex::{Regex, RegexBuilder};
use std::ops::{Index, Range};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Number of lines covered by one result group.
pub const GROUP_SIZE: usize = 1000;

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, letters must match exactly; otherwise case is folded.
    pub case_sensitive: bool,
    /// If `true`, a match must not be preceded or followed by a word character.
    pub whole_word: bool,
}

/// A half-open match `[start, end)`. Multi-line terms produce matches spanning lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchMatch {
    /// First matched character.
    pub start: Coordinate,
    /// Just past the last matched character.
    pub end: Coordinate,
}

/// Lifecycle of a [`SearchInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Workers are scanning.
    Running,
    /// Cancellation was requested; workers have not all exited yet.
    Stopping,
    /// Cancelled before completion. No results are available.
    Stopped,
    /// Finished; results are available.
    HasResult,
}

impl SearchState {
    /// Returns `true` once no worker can touch the result any more.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Stopped | Self::HasResult)
    }
}

/// Search errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The search term could not be compiled.
    #[error("invalid search term: {0}")]
    Pattern(#[from] regex::Error),
    /// The manager thread could not be spawned.
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// All matches of a search in line order, bucketed by [`GROUP_SIZE`] lines.
///
/// Group `g` covers lines `g * GROUP_SIZE .. (g + 1) * GROUP_SIZE`, so a renderer can fetch
/// the matches of a visible line without scanning the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResultGroups {
    matches: Vec<SearchMatch>,
    groups: Vec<Range<usize>>,
}

impl SearchResultGroups {
    /// An empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a match. Matches must be added in line order; call
    /// [`SearchResultGroups::update_groups`] afterwards.
    pub fn add_result(&mut self, m: SearchMatch) {
        self.matches.push(m);
    }

    /// Rebuild the per-group index from the flat match list.
    pub fn update_groups(&mut self) {
        self.groups.clear();
        let Some(last) = self.matches.last() else {
            return;
        };
        let count = last.start.y / GROUP_SIZE + 1;
        let mut begin = 0;
        for g in 0..count {
            let limit = (g + 1) * GROUP_SIZE;
            let end = begin + self.matches[begin..].partition_point(|m| m.start.y < limit);
            self.groups.push(begin..end);
            begin = end;
        }
    }

    /// Matches starting in the group that contains `line`.
    pub fn group(&self, line: usize) -> &[SearchMatch] {
        self.groups
            .get(line / GROUP_SIZE)
            .map_or(&[], |range| &self.matches[range.clone()])
    }

    /// Returns `true` if the group containing `line` holds at least one match.
    pub fn group_exists(&self, line: usize) -> bool {
        !self.group(line).is_empty()
    }

    /// Matches starting on a line inside `lines`.
    pub fn matches_in_lines(&self, lines: Range<usize>) -> &[SearchMatch] {
        let begin = self.matches.partition_point(|m| m.start.y < lines.start);
        let end = self.matches.partition_point(|m| m.start.y < lines.end);
        &self.matches[begin..end.max(begin)]
    }

    /// All matches in line order.
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Index of the first match starting at or after `c`.
    pub fn first_at_or_after(&self, c: Coordinate) -> Option<usize> {
        let i = self.matches.partition_point(|m| m.start < c);
        (i < self.matches.len()).then_some(i)
    }

    /// Index of the last match starting before `c`.
    pub fn last_before(&self, c: Coordinate) -> Option<usize> {
        self.matches.partition_point(|m| m.start < c).checked_sub(1)
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns `true` if there are no matches.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Remove every match and group.
    pub fn clear(&mut self) {
        self.matches.clear();
        self.groups.clear();
    }
}

impl Index<usize> for SearchResultGroups {
    type Output = SearchMatch;

    fn index(&self, index: usize) -> &SearchMatch {
        &self.matches[index]
    }
}

/// Compiled form of a (possibly multi-line) term.
///
/// A term with `n` newline-separated segments matches at line `y` when the first segment
/// ends line `y`, each middle segment is all of its line, and the last segment starts line
/// `y + n - 1`.
#[derive(Debug)]
struct Matcher {
    segments: Vec<Regex>,
    whole_word: bool,
}

impl Matcher {
    fn new(term: &str, options: SearchOptions) -> Result<Self, regex::Error> {
        let parts: Vec<&str> = term.split('\n').collect();
        let last = parts.len() - 1;
        let segments = parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let escaped = regex::escape(part.strip_suffix('\r').unwrap_or(part));
                let pattern = match (i == 0, i == last) {
                    (true, true) => escaped,
                    (true, false) => format!("{escaped}\\z"),
                    (false, true) => format!("\\A{escaped}"),
                    (false, false) => format!("\\A{escaped}\\z"),
                };
                RegexBuilder::new(&pattern)
                    .case_insensitive(!options.case_sensitive)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            segments,
            whole_word: options.whole_word,
        })
    }

    fn scan_line(&self, lines: &[String], y: usize, out: &mut Vec<SearchMatch>) {
        let line = &lines[y];
        let [first, rest @ ..] = self.segments.as_slice() else {
            return;
        };

        if rest.is_empty() {
            for m in first.find_iter(line) {
                if m.start() == m.end() {
                    continue;
                }
                if self.whole_word && !is_whole_word(line, m.start(), line, m.end()) {
                    continue;
                }
                out.push(SearchMatch {
                    start: Coordinate::new(char_column(line, m.start()), y),
                    end: Coordinate::new(char_column(line, m.end()), y),
                });
            }
            return;
        }

        if y + rest.len() >= lines.len() {
            return;
        }
        let Some(head) = first.find(line) else {
            return;
        };
        let mut tail_end = 0;
        for (k, segment) in rest.iter().enumerate() {
            match segment.find(&lines[y + 1 + k]) {
                Some(m) => tail_end = m.end(),
                None => return,
            }
        }

        let last_line = &lines[y + rest.len()];
        if self.whole_word && !is_whole_word(line, head.start(), last_line, tail_end) {
            return;
        }
        out.push(SearchMatch {
            start: Coordinate::new(char_column(line, head.start()), y),
            end: Coordinate::new(char_column(last_line, tail_end), y + rest.len()),
        });
    }
}

fn char_column(line: &str, byte: usize) -> usize {
    line[..byte].chars().count()
}

fn is_whole_word(start_line: &str, start: usize, end_line: &str, end: usize) -> bool {
    let before = start_line[..start].chars().next_back();
    let after = end_line[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

#[derive(Debug)]
struct Progress {
    state: SearchState,
    result: SearchResultGroups,
}

#[derive(Debug)]
struct Shared {
    progress: Mutex<Progress>,
    finished: Condvar,
}

impl Shared {
    fn finish(&self, state: SearchState, result: SearchResultGroups) {
        let mut progress = self.progress.lock();
        progress.state = state;
        progress.result = result;
        self.finished.notify_all();
    }
}

/// One running (or finished) search over a snapshot of a file's lines.
///
/// Dropping an instance stops it and joins its threads.
#[derive(Debug)]
pub struct SearchInstance {
    term: String,
    options: SearchOptions,
    shared: Arc<Shared>,
    cancel: CancellationToken,
    manager: Option<JoinHandle<()>>,
}

impl SearchInstance {
    /// Start searching `lines` for `term` on `workers` threads.
    ///
    /// An empty or whitespace-only term finishes immediately with no matches.
    pub fn start(
        lines: Arc<[String]>,
        term: &str,
        options: SearchOptions,
        workers: usize,
    ) -> Result<Self, SearchError> {
        let shared = Arc::new(Shared {
            progress: Mutex::new(Progress {
                state: SearchState::Running,
                result: SearchResultGroups::new(),
            }),
            finished: Condvar::new(),
        });
        let cancel = CancellationToken::new();
        let mut instance = Self {
            term: term.to_string(),
            options,
            shared: Arc::clone(&shared),
            cancel: cancel.clone(),
            manager: None,
        };

        if term.trim().is_empty() {
            shared.finish(SearchState::HasResult, SearchResultGroups::new());
            return Ok(instance);
        }

        let matcher = Arc::new(Matcher::new(term, options)?);
        let workers = workers.max(1);
        debug!(term, lines = lines.len(), workers, "starting search");

        let manager = thread::Builder::new()
            .name("geno-search".to_string())
            .spawn(move || run_manager(lines, matcher, workers, cancel, shared))?;
        instance.manager = Some(manager);
        Ok(instance)
    }

    /// The term being searched for.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The options the search was started with.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        self.shared.progress.lock().state
    }

    /// Request cancellation without waiting.
    pub fn stop(&self) {
        let mut progress = self.shared.progress.lock();
        if progress.state == SearchState::Running {
            progress.state = SearchState::Stopping;
        }
        drop(progress);
        self.cancel.cancel();
    }

    /// Block until the search has finished (or been stopped) and join its threads.
    pub fn wait(&mut self) -> SearchState {
        let state = {
            let mut progress = self.shared.progress.lock();
            while !progress.state.is_finished() {
                self.shared.finished.wait(&mut progress);
            }
            progress.state
        };
        if let Some(manager) = self.manager.take()
            && manager.join().is_err()
        {
            warn!(term = %self.term, "search manager panicked");
        }
        state
    }

    /// Request cancellation and block until the instance is no longer running.
    pub fn stop_and_join(&mut self) -> SearchState {
        self.stop();
        self.wait()
    }

    /// Run `f` on the current result. Empty unless the state is [`SearchState::HasResult`].
    pub fn with_results<R>(&self, f: impl FnOnce(&SearchResultGroups) -> R) -> R {
        f(&self.shared.progress.lock().result)
    }
}

impl Drop for SearchInstance {
    fn drop(&mut self) {
        if self.manager.is_some() {
            self.stop_and_join();
        }
    }
}

fn run_manager(
    lines: Arc<[String]>,
    matcher: Arc<Matcher>,
    workers: usize,
    cancel: CancellationToken,
    shared: Arc<Shared>,
) {
    let chunk = lines.len().div_ceil(workers).max(1);
    let mut handles = Vec::with_capacity(workers);

    for (index, begin) in (0..lines.len()).step_by(chunk).enumerate() {
        let end = (begin + chunk).min(lines.len());
        let lines = Arc::clone(&lines);
        let matcher = Arc::clone(&matcher);
        let worker_cancel = cancel.child_token();
        let spawned = thread::Builder::new()
            .name(format!("geno-search-{index}"))
            .spawn(move || scan_chunk(&lines, &matcher, begin..end, &worker_cancel));
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                warn!(%err, "failed to spawn search worker");
                cancel.cancel();
            }
        }
    }

    // Joining in spawn order keeps the merged matches in line order.
    let mut result = SearchResultGroups::new();
    let mut complete = true;
    for handle in handles {
        match handle.join() {
            Ok(Some(found)) => found.into_iter().for_each(|m| result.add_result(m)),
            Ok(None) => complete = false,
            Err(_) => {
                warn!("search worker panicked");
                complete = false;
            }
        }
    }

    if complete && !cancel.is_cancelled() {
        result.update_groups();
        debug!(matches = result.len(), "search finished");
        shared.finish(SearchState::HasResult, result);
    } else {
        debug!("search stopped");
        shared.finish(SearchState::Stopped, SearchResultGroups::new());
    }
}

fn scan_chunk(
    lines: &[String],
    matcher: &Matcher,
    range: Range<usize>,
    cancel: &CancellationToken,
) -> Option<Vec<SearchMatch>> {
    trace!(?range, "search worker started");
    let mut found = Vec::new();
    for y in range {
        if cancel.is_cancelled() {
            return None;
        }
        matcher.scan_line(lines, y, &mut found);
    }
    Some(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(text: &str) -> Arc<[String]> {
        text.split('\n').map(str::to_string).collect()
    }

    fn run(text: &str, term: &str, options: SearchOptions, workers: usize) -> Vec<SearchMatch> {
        let mut search = SearchInstance::start(snapshot(text), term, options, workers).unwrap();
        assert_eq!(search.wait(), SearchState::HasResult);
        search.with_results(|r| r.matches().to_vec())
    }

    fn lines_of(matches: &[SearchMatch]) -> Vec<usize> {
        matches.iter().map(|m| m.start.y).collect()
    }

    #[test]
    fn test_case_and_whole_word() {
        let text = "foo\nFOO\nbarfoo\n";
        let folded = run(text, "foo", SearchOptions::default(), 2);
        assert_eq!(lines_of(&folded), vec![0, 1, 2]);

        let exact = SearchOptions {
            case_sensitive: true,
            whole_word: false,
        };
        assert_eq!(lines_of(&run(text, "foo", exact, 2)), vec![0, 2]);

        let whole = SearchOptions {
            case_sensitive: false,
            whole_word: true,
        };
        assert_eq!(lines_of(&run(text, "foo", whole, 2)), vec![0, 1]);

        let both = SearchOptions {
            case_sensitive: true,
            whole_word: true,
        };
        assert_eq!(lines_of(&run(text, "foo", both, 2)), vec![0]);
    }

    #[test]
    fn test_columns_are_characters() {
        let matches = run("äöü foo", "foo", SearchOptions::default(), 1);
        assert_eq!(
            matches,
            vec![SearchMatch {
                start: Coordinate::new(4, 0),
                end: Coordinate::new(7, 0),
            }]
        );
    }

    #[test]
    fn test_multi_line_term() {
        let matches = run("int a;\nint b;\nint c;", "a;\nint", SearchOptions::default(), 3);
        assert_eq!(
            matches,
            vec![SearchMatch {
                start: Coordinate::new(4, 0),
                end: Coordinate::new(3, 1),
            }]
        );
        assert!(run("x\ny", "x\ny\nz", SearchOptions::default(), 1).is_empty());
    }

    #[test]
    fn test_merge_is_in_line_order_for_any_worker_count() {
        let text: String = (0..200).map(|i| format!("line {i} needle\n")).collect();
        for workers in [1, 3, 7, 64, 500] {
            let matches = run(&text, "needle", SearchOptions::default(), workers);
            assert_eq!(matches.len(), 200);
            assert!(matches.windows(2).all(|w| w[0].start < w[1].start));
        }
    }

    #[test]
    fn test_blank_term_is_an_empty_result() {
        for term in ["", "   ", "\t\n"] {
            let search =
                SearchInstance::start(snapshot("a b c"), term, SearchOptions::default(), 4).unwrap();
            assert_eq!(search.state(), SearchState::HasResult);
            assert!(search.with_results(SearchResultGroups::is_empty));
        }
    }

    #[test]
    fn test_stop_and_join_never_leaves_running_state() {
        let text = "needle\n".repeat(50_000);
        let mut search =
            SearchInstance::start(snapshot(&text), "needle", SearchOptions::default(), 4).unwrap();
        search.stop();
        let state = search.stop_and_join();
        assert!(state.is_finished());
        if state == SearchState::Stopped {
            assert!(search.with_results(SearchResultGroups::is_empty));
        }
    }

    #[test]
    fn test_groups_bucket_by_thousand_lines() {
        let mut groups = SearchResultGroups::new();
        for y in [3, 999, 1000, 2500, 2999] {
            groups.add_result(SearchMatch {
                start: Coordinate::new(0, y),
                end: Coordinate::new(1, y),
            });
        }
        groups.update_groups();

        assert_eq!(groups.group(0).len(), 2);
        assert_eq!(groups.group(1500).len(), 1);
        assert_eq!(groups.group(2000).len(), 2);
        assert!(!groups.group_exists(3000));
        assert_eq!(groups.matches_in_lines(999..2501).len(), 3);
        assert_eq!(groups[2].start.y, 1000);
        assert_eq!(groups.first_at_or_after(Coordinate::new(0, 1001)), Some(3));
        assert_eq!(groups.last_before(Coordinate::new(0, 3)), None);

        groups.clear();
        assert!(groups.is_empty());
        assert!(!groups.group_exists(0));
    }
}
