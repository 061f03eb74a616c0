//! In-memory log line storage.
//!
//! The viewer keeps the whole file in memory as an ordered sequence of lines,
//! each line retaining its trailing terminator exactly as read. The buffer is
//! append-only while tail mode is active and wholesale replaced when a new
//! file is opened.

use bstr::ByteSlice;

/// A single line of log text, including its trailing line terminator (if the
/// source had one). Lines are never mutated after being read.
pub type LogLine = String;

/// Ordered sequence of [`LogLine`]s in file byte order.
///
/// Invariant: the sequence order equals file order; lines are never reordered
/// or deduplicated.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: Vec<LogLine>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from already-split lines.
    pub fn from_lines(lines: Vec<LogLine>) -> Self {
        Self { lines }
    }

    /// Replace the entire contents (a new file was opened).
    pub fn replace(&mut self, lines: Vec<LogLine>) {
        self.lines = lines;
    }

    /// Append a batch of new lines delivered by the tail feed.
    pub fn append(&mut self, new_lines: impl IntoIterator<Item = LogLine>) {
        self.lines.extend(new_lines);
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The full buffer as one string, terminators preserved. Used for the
    /// initial (unfiltered) render after opening a file.
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

/// Split raw bytes into lines, keeping each line's terminator attached.
///
/// A trailing partial line with no terminator yet is still a line: during
/// tail mode the writer may not have finished it, and the next read picks up
/// from the following byte regardless. Invalid UTF-8 is replaced lossily,
/// matching how log files are read on open.
pub fn split_lines(bytes: &[u8]) -> Vec<LogLine> {
    bytes
        .lines_with_terminator()
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect()
}
