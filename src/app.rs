//! Viewer-core orchestration layer.
//!
//! [`LogViewer`] coordinates the buffer, filter engine, tail feed, and search
//! index behind the surface the UI collaborator calls into. It holds no UI
//! state of its own: the collaborator keeps current field values and builds a
//! fresh [`FilterInputs`] per invocation.
//!
//! Threading model: the viewer lives on the control thread. The tail worker
//! runs in the background, but its results only take effect when the
//! controller receives a [`TailUpdate`] and passes it to
//! [`apply_tail_update`](LogViewer::apply_tail_update) — buffer and rendered
//! text are never mutated from the worker side.

use crate::buffer::LogBuffer;
use crate::error::{LogsieveError, Result};
use crate::file_source::{DiskFileSource, FileSource};
use crate::filter::{self, FilterInputs, FilterSpec, MatchResult};
use crate::search::{SearchIndex, SearchScanner};
use crate::tail::{TailFeed, TailUpdate};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Application core coordinating file content, filtering, tailing, and
/// find-in-results.
pub struct LogViewer {
    source: Arc<dyn FileSource>,
    buffer: LogBuffer,
    current_file: Option<PathBuf>,
    /// The text currently on screen: raw content after open, filter output
    /// after a filter run, plus any matching tail appends.
    rendered: String,
    /// `None` until the first filter pass; `Some(0)` is the explicit
    /// "no matches" outcome, distinct from an untouched view.
    last_match_count: Option<usize>,
    tail: TailFeed,
    tail_updates: Option<mpsc::Receiver<TailUpdate>>,
    search_term: Option<String>,
    search: Option<SearchIndex>,
}

impl LogViewer {
    pub fn new(source: Arc<dyn FileSource>) -> Self {
        Self {
            source,
            buffer: LogBuffer::new(),
            current_file: None,
            rendered: String::new(),
            last_match_count: None,
            tail: TailFeed::new(),
            tail_updates: None,
            search_term: None,
            search: None,
        }
    }

    /// A viewer reading from the local filesystem.
    pub fn with_disk_source() -> Self {
        Self::new(Arc::new(DiskFileSource::new()))
    }

    /// Open a file, replacing the buffer and rendering its full content.
    ///
    /// Any active tail stops: the watch is bound to the previous path, and
    /// the collaborator restarts tailing for the new file if desired.
    /// Returns the number of lines loaded.
    pub async fn open(&mut self, path: &Path) -> Result<usize> {
        let lines = self.source.read_all_lines(path).await?;

        self.stop_tail();
        self.buffer.replace(lines);
        self.current_file = Some(path.to_path_buf());
        self.rendered = self.buffer.text();
        self.last_match_count = None;
        self.clear_search();

        log::debug!("opened {} ({} lines)", path.display(), self.buffer.len());
        Ok(self.buffer.len())
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len()
    }

    /// The text currently displayed (search operates over this).
    pub fn rendered_text(&self) -> &str {
        &self.rendered
    }

    /// Match count of the most recent filter pass, if any.
    pub fn last_match_count(&self) -> Option<usize> {
        self.last_match_count
    }

    /// Run a full filter pass over the loaded file.
    ///
    /// Builds a fresh spec from the inputs (aborting with a bound-specific
    /// error on bad time text, leaving the previous view untouched), replaces
    /// the rendered text with the result, and — when tailing — pushes the new
    /// spec to the tail worker so it applies from the next batch on.
    pub fn run_filter(&mut self, inputs: &FilterInputs) -> Result<MatchResult> {
        if self.current_file.is_none() {
            return Err(LogsieveError::other("no log file is open"));
        }

        let spec = FilterSpec::from_inputs(inputs)?;
        let result = filter::filter(self.buffer.lines(), &spec)?;

        if self.tail.is_watching() {
            self.tail.update_filter(spec);
        }

        self.rendered = result.filtered_text.clone();
        self.last_match_count = Some(result.match_count);
        self.clear_search();

        Ok(result)
    }

    /// Start tail mode on the current file, from its current size.
    pub async fn start_tail(&mut self, inputs: &FilterInputs) -> Result<()> {
        let path = self
            .current_file
            .clone()
            .ok_or_else(|| LogsieveError::other("no log file is open"))?;
        let spec = FilterSpec::from_inputs(inputs)?;

        let updates = self
            .tail
            .start(Arc::clone(&self.source), &path, spec, false)
            .await?;
        self.tail_updates = Some(updates);
        Ok(())
    }

    pub fn is_tailing(&self) -> bool {
        self.tail.is_watching()
    }

    /// Stop tail mode. Dropping the update channel discards any in-flight
    /// worker result; displayed content is untouched.
    pub fn stop_tail(&mut self) {
        self.tail.stop();
        self.tail_updates = None;
    }

    /// Await the next tail update. `None` when not tailing or when the
    /// worker has exited.
    pub async fn next_tail_update(&mut self) -> Option<TailUpdate> {
        self.tail_updates.as_mut()?.recv().await
    }

    /// Non-blocking variant for event-loop polling.
    pub fn try_next_tail_update(&mut self) -> Option<TailUpdate> {
        self.tail_updates.as_mut()?.try_recv().ok()
    }

    /// Apply a received tail update on the control thread.
    ///
    /// Appends the raw new lines to the buffer and the matching text to the
    /// rendered view, returning the batch's match count. A worker error
    /// transitions tail mode to stopped and is returned to the caller.
    pub fn apply_tail_update(&mut self, update: TailUpdate) -> Result<usize> {
        match update {
            TailUpdate::Appended {
                new_lines,
                filtered_text,
                match_count,
                read_to,
            } => {
                self.buffer.append(new_lines);
                if !filtered_text.is_empty() {
                    self.rendered.push_str(&filtered_text);
                    // Appended text invalidates search offsets.
                    self.clear_search();
                }
                log::debug!("tail appended {} matching lines (offset {})", match_count, read_to);
                Ok(match_count)
            }
            TailUpdate::Error { error } => {
                self.stop_tail();
                Err(error)
            }
        }
    }

    /// Begin a find-in-results scan over the current rendered text.
    ///
    /// The returned scanner is bound to this term; starting a newer scan
    /// supersedes it (last-write-wins: [`install_search`](Self::install_search)
    /// rejects indexes for any term but the most recent).
    pub fn begin_search(&mut self, term: &str) -> Result<SearchScanner> {
        if term.is_empty() {
            self.clear_search();
        }
        self.search_term = Some(term.to_string());
        SearchScanner::new(Arc::from(self.rendered.as_str()), term)
    }

    /// Install a finished index. Returns false (and drops the index) when a
    /// newer term has been entered since the scan began.
    pub fn install_search(&mut self, index: SearchIndex) -> bool {
        match &self.search_term {
            Some(term) if term == index.term() => {
                self.search = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn search_index(&self) -> Option<&SearchIndex> {
        self.search.as_ref()
    }

    /// Move the search selection (+1 next / -1 previous, wrapping).
    pub fn navigate_search(&mut self, direction: i32) -> Option<usize> {
        self.search.as_mut()?.navigate(direction)
    }

    /// Drop the search state (search UI closed or text changed).
    pub fn clear_search(&mut self) {
        self.search_term = None;
        self.search = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_log(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write contents");
        file
    }

    #[tokio::test]
    async fn test_open_renders_full_content() {
        let file = temp_log("10:00:00.000 INFO start\n10:00:01.500 ERROR fail\n");
        let mut viewer = LogViewer::with_disk_source();

        let lines = viewer.open(file.path()).await.unwrap();
        assert_eq!(lines, 2);
        assert_eq!(
            viewer.rendered_text(),
            "10:00:00.000 INFO start\n10:00:01.500 ERROR fail\n"
        );
        assert_eq!(viewer.last_match_count(), None);
    }

    #[tokio::test]
    async fn test_filter_requires_open_file() {
        let mut viewer = LogViewer::with_disk_source();
        let result = viewer.run_filter(&FilterInputs::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_filter_updates_rendered_text_and_count() {
        let file = temp_log("one ERROR\ntwo INFO\nthree ERROR\n");
        let mut viewer = LogViewer::with_disk_source();
        viewer.open(file.path()).await.unwrap();

        let result = viewer
            .run_filter(&FilterInputs {
                include_text: "ERROR".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(result.match_count, 2);
        assert_eq!(viewer.rendered_text(), "one ERROR\nthree ERROR\n");
        assert_eq!(viewer.last_match_count(), Some(2));
    }

    #[tokio::test]
    async fn test_bad_time_bound_leaves_previous_view_untouched() {
        let file = temp_log("a\nb\n");
        let mut viewer = LogViewer::with_disk_source();
        viewer.open(file.path()).await.unwrap();

        let err = viewer
            .run_filter(&FilterInputs {
                start_time_text: "nope".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LogsieveError::TimeFormat { .. }));
        assert_eq!(viewer.rendered_text(), "a\nb\n");
        assert_eq!(viewer.last_match_count(), None);
    }

    #[tokio::test]
    async fn test_zero_matches_is_reported_not_errored() {
        let file = temp_log("a\nb\n");
        let mut viewer = LogViewer::with_disk_source();
        viewer.open(file.path()).await.unwrap();

        let result = viewer
            .run_filter(&FilterInputs {
                include_text: "absent".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(result.match_count, 0);
        assert_eq!(viewer.last_match_count(), Some(0));
        assert_eq!(viewer.rendered_text(), "");
    }

    #[tokio::test]
    async fn test_search_lifecycle_with_stale_rejection() {
        let file = temp_log("alpha beta alpha\n");
        let mut viewer = LogViewer::with_disk_source();
        viewer.open(file.path()).await.unwrap();

        let stale = viewer.begin_search("alpha").unwrap();
        // User types a newer term before the first scan lands.
        let fresh = viewer.begin_search("beta").unwrap();

        assert!(!viewer.install_search(stale.run_to_completion()));
        assert!(viewer.install_search(fresh.run_to_completion()));
        assert_eq!(viewer.search_index().unwrap().len(), 1);
        assert_eq!(viewer.navigate_search(1), Some(6)); // wraps onto itself
    }

    #[tokio::test]
    async fn test_start_tail_requires_open_file() {
        let mut viewer = LogViewer::with_disk_source();
        let result = viewer.start_tail(&FilterInputs::default()).await;
        assert!(result.is_err());
        assert!(!viewer.is_tailing());
    }

    #[tokio::test]
    async fn test_apply_appended_update_extends_buffer_and_view() {
        let file = temp_log("first ERROR\n");
        let mut viewer = LogViewer::with_disk_source();
        viewer.open(file.path()).await.unwrap();
        viewer
            .run_filter(&FilterInputs {
                include_text: "ERROR".to_string(),
                ..Default::default()
            })
            .unwrap();

        let count = viewer
            .apply_tail_update(TailUpdate::Appended {
                new_lines: vec!["second INFO\n".to_string(), "third ERROR\n".to_string()],
                filtered_text: "third ERROR\n".to_string(),
                match_count: 1,
                read_to: 37,
            })
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(viewer.line_count(), 3);
        assert_eq!(viewer.rendered_text(), "first ERROR\nthird ERROR\n");
    }

    #[tokio::test]
    async fn test_apply_error_update_stops_tailing() {
        let file = temp_log("x\n");
        let mut viewer = LogViewer::with_disk_source();
        viewer.open(file.path()).await.unwrap();
        viewer.start_tail(&FilterInputs::default()).await.unwrap();
        assert!(viewer.is_tailing());

        let err = viewer
            .apply_tail_update(TailUpdate::Error {
                error: LogsieveError::other("file vanished"),
            })
            .unwrap_err();
        assert!(matches!(err, LogsieveError::Other { .. }));
        assert!(!viewer.is_tailing());
    }
}
