//! File access abstraction for the viewer core.
//!
//! The core never touches the filesystem directly; it issues these four
//! calls against a [`FileSource`] collaborator. This keeps the filtering and
//! tailing logic testable against in-memory fixtures and lets the embedding
//! application substitute its own I/O layer.

use crate::buffer::LogLine;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub mod disk;

pub use disk::DiskFileSource;

/// Core trait for file access operations.
///
/// Implementations must be `Send + Sync`: the tail worker holds the source
/// across await points on a background task.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Read the whole file as terminator-preserving lines, in file order.
    async fn read_all_lines(&self, path: &Path) -> Result<Vec<LogLine>>;

    /// Read the raw byte range `[from, to)`.
    async fn read_range(&self, path: &Path, from: u64, to: u64) -> Result<Vec<u8>>;

    /// Current file size in bytes.
    async fn file_size(&self, path: &Path) -> Result<u64>;

    /// Whether the path currently exists.
    async fn file_exists(&self, path: &Path) -> bool;
}
