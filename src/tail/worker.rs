//! Background worker processing tail commands off the control thread.
//!
//! One worker per watch. Commands arrive in order and are handled one at a
//! time, so a large append cannot overlap a second filter pass and batches
//! can never be delivered out of file order.

use crate::buffer::split_lines;
use crate::error::LogsieveError;
use crate::file_source::FileSource;
use crate::filter::{self, FilterSpec};
use crate::tail::{TailCommand, TailCursor, TailUpdate};
use std::sync::Arc;
use tokio::sync::mpsc::{Sender, UnboundedReceiver};

/// Run the tail worker, processing commands until shutdown or a fatal error.
pub async fn tail_worker_loop(
    mut rx: UnboundedReceiver<TailCommand>,
    tx: Sender<TailUpdate>,
    source: Arc<dyn FileSource>,
    cursor: TailCursor,
    spec: FilterSpec,
) {
    let mut state = WorkerState::new(source, cursor, spec);

    while let Some(cmd) = rx.recv().await {
        let outcome = state.handle_command(cmd).await;
        if let Some(update) = outcome.update {
            if tx.send(update).await.is_err() {
                // Receiver dropped: the feed was stopped and this result is
                // stale. Discard and exit.
                break;
            }
        }

        if outcome.done {
            break;
        }
    }
}

struct WorkerState {
    source: Arc<dyn FileSource>,
    cursor: TailCursor,
    spec: FilterSpec,
}

impl WorkerState {
    fn new(source: Arc<dyn FileSource>, cursor: TailCursor, spec: FilterSpec) -> Self {
        Self {
            source,
            cursor,
            spec,
        }
    }

    async fn handle_command(&mut self, cmd: TailCommand) -> HandlerOutcome {
        match cmd {
            TailCommand::PathChanged => self.process_change().await,
            TailCommand::UpdateFilter(new_spec) => {
                self.spec = new_spec;
                HandlerOutcome::quiet()
            }
            TailCommand::WatchFailed(message) => {
                HandlerOutcome::fail(LogsieveError::watch(message))
            }
            TailCommand::Shutdown => HandlerOutcome::exit(),
        }
    }

    /// Compare sizes, read the grown range, filter it, advance the cursor.
    async fn process_change(&mut self) -> HandlerOutcome {
        if !self.source.file_exists(&self.cursor.path).await {
            return HandlerOutcome::fail(LogsieveError::FileNotFound {
                path: self.cursor.path.clone(),
            });
        }

        let current_size = match self.source.file_size(&self.cursor.path).await {
            Ok(size) => size,
            Err(error) => return HandlerOutcome::fail(error),
        };

        if current_size < self.cursor.last_read_offset {
            // Truncated or rotated: treat the file as new.
            log::debug!(
                "{} shrank ({} -> {}), rewinding",
                self.cursor.path.display(),
                self.cursor.last_read_offset,
                current_size
            );
            self.cursor.rewind();
        }

        if current_size == self.cursor.last_read_offset {
            // Duplicate notification for an already-consumed range.
            return HandlerOutcome::quiet();
        }

        let bytes = match self
            .source
            .read_range(&self.cursor.path, self.cursor.last_read_offset, current_size)
            .await
        {
            Ok(bytes) => bytes,
            Err(error) => return HandlerOutcome::fail(error),
        };

        let new_lines = split_lines(&bytes);
        let result = match filter::filter(&new_lines, &self.spec) {
            Ok(result) => result,
            Err(error) => return HandlerOutcome::fail(error),
        };

        // Exactly once per processed notification, even with zero matches.
        self.cursor.advance(current_size);

        HandlerOutcome::deliver(TailUpdate::Appended {
            new_lines,
            filtered_text: result.filtered_text,
            match_count: result.match_count,
            read_to: current_size,
        })
    }
}

struct HandlerOutcome {
    update: Option<TailUpdate>,
    done: bool,
}

impl HandlerOutcome {
    fn deliver(update: TailUpdate) -> Self {
        Self {
            update: Some(update),
            done: false,
        }
    }

    fn quiet() -> Self {
        Self {
            update: None,
            done: false,
        }
    }

    fn exit() -> Self {
        Self {
            update: None,
            done: true,
        }
    }

    /// Surface the error and stop: tail errors are not retried.
    fn fail(error: LogsieveError) -> Self {
        Self {
            update: Some(TailUpdate::Error { error }),
            done: true,
        }
    }
}
