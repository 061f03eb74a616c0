//! Incremental tail-follow of a growing log file.
//!
//! [`TailFeed`] is a two-state machine (`Stopped` / `Watching`). Starting a
//! watch captures the file's current size so tailing begins from "now", wires
//! a filesystem watcher to a background worker task, and hands the caller a
//! channel of [`TailUpdate`]s. The worker reads only the byte range that grew
//! since the last processed notification, splits it into
//! terminator-preserving lines, and filters the batch with whatever
//! [`FilterSpec`] is current at that moment — filter edits take effect on the
//! next update without restarting the watch.
//!
//! Change notifications are processed strictly in arrival order on a single
//! worker; at most one filter pass is in flight at a time. Duplicate or
//! spurious notifications are no-ops because the size/offset comparison is
//! idempotent. Stopping drops the watcher and the update channel, so an
//! in-flight result is discarded rather than interrupted.

use crate::error::{LogsieveError, Result};
use crate::buffer::LogLine;
use crate::file_source::FileSource;
use crate::filter::FilterSpec;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

pub mod worker;

pub use worker::tail_worker_loop;

/// Where the next incremental read starts.
///
/// Advanced exactly once per processed notification — including when zero
/// new lines matched — so the same bytes are never re-read. Rewound to zero
/// when the file shrinks (truncation or rotation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailCursor {
    pub path: PathBuf,
    pub last_read_offset: u64,
}

impl TailCursor {
    pub fn new(path: PathBuf, last_read_offset: u64) -> Self {
        Self {
            path,
            last_read_offset,
        }
    }

    /// Treat the file as new: the next read starts from the beginning.
    pub fn rewind(&mut self) {
        self.last_read_offset = 0;
    }

    pub fn advance(&mut self, to: u64) {
        self.last_read_offset = to;
    }
}

/// Commands delivered to the tail worker.
#[derive(Debug, Clone, PartialEq)]
pub enum TailCommand {
    /// The watched path changed on disk; compare sizes and read the growth.
    PathChanged,
    /// Replace the filter spec used for subsequent batches.
    UpdateFilter(FilterSpec),
    /// The watcher backend reported an error.
    WatchFailed(String),
    Shutdown,
}

/// Updates emitted by the tail worker back to the control thread.
///
/// All `LogBuffer` mutation happens on the receiving side: the update
/// carries the raw new lines so the controller can append them itself.
#[derive(Debug)]
pub enum TailUpdate {
    Appended {
        /// Every new line read from the file, matching or not.
        new_lines: Vec<LogLine>,
        /// Concatenation of the lines that passed the filter, in file order.
        filtered_text: String,
        match_count: usize,
        /// The cursor position after this batch.
        read_to: u64,
    },
    /// The worker hit an unrecoverable condition and stopped. The feed
    /// should be transitioned to `Stopped`; there is no automatic retry.
    Error { error: LogsieveError },
}

/// Handle to an active watch. Dropping the notify watcher cancels future
/// notifications; the worker exits once it processes `Shutdown`.
struct WatchHandle {
    _watcher: RecommendedWatcher,
    cmd_tx: mpsc::UnboundedSender<TailCommand>,
}

/// The tail-mode state machine: `Stopped -> Watching -> Stopped`.
#[derive(Default)]
pub struct TailFeed {
    watching: Option<WatchHandle>,
}

impl TailFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_watching(&self) -> bool {
        self.watching.is_some()
    }

    /// Transition `Stopped -> Watching`.
    ///
    /// Requires an existing file. Unless `from_start` is set, the current
    /// file size becomes the initial read offset, so existing content is not
    /// re-shown. If a watch is already active it is stopped first; the new
    /// watch starts from the file's current size.
    ///
    /// Returns the update channel. Dropping the receiver (or calling
    /// [`stop`](Self::stop)) discards any in-flight result.
    pub async fn start(
        &mut self,
        source: Arc<dyn FileSource>,
        path: &Path,
        spec: FilterSpec,
        from_start: bool,
    ) -> Result<mpsc::Receiver<TailUpdate>> {
        self.stop();

        if !source.file_exists(path).await {
            return Err(LogsieveError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let initial_offset = if from_start {
            0
        } else {
            source.file_size(path).await?
        };

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::channel(32);

        let cursor = TailCursor::new(path.to_path_buf(), initial_offset);
        tokio::spawn(tail_worker_loop(cmd_rx, update_tx, source, cursor, spec));

        // The notify callback runs on the watcher's own thread; an unbounded
        // sender bridges it onto the worker without blocking that thread.
        let notify_tx = cmd_tx.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let cmd = match res {
                Ok(_) => TailCommand::PathChanged,
                Err(e) => TailCommand::WatchFailed(e.to_string()),
            };
            let _ = notify_tx.send(cmd);
        })?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;

        log::debug!(
            "tail watch started on {} from offset {}",
            path.display(),
            initial_offset
        );

        self.watching = Some(WatchHandle {
            _watcher: watcher,
            cmd_tx,
        });
        Ok(update_rx)
    }

    /// Replace the filter spec used for subsequent batches. Returns false
    /// when no watch is active.
    pub fn update_filter(&self, spec: FilterSpec) -> bool {
        match &self.watching {
            Some(handle) => handle.cmd_tx.send(TailCommand::UpdateFilter(spec)).is_ok(),
            None => false,
        }
    }

    /// Transition `Watching -> Stopped`. Already-displayed content is left
    /// untouched; a no-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.watching.take() {
            let _ = handle.cmd_tx.send(TailCommand::Shutdown);
            log::debug!("tail watch stopped");
        }
    }
}
