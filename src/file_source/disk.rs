//! Disk-backed [`FileSource`] implementation on `tokio::fs`.

use crate::buffer::{split_lines, LogLine};
use crate::error::{LogsieveError, Result};
use crate::file_source::FileSource;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};

/// Reads log files from the local filesystem.
///
/// Files are decoded lossily: log files routinely contain stray bytes and a
/// viewer must not refuse to open them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSource;

impl DiskFileSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSource for DiskFileSource {
    async fn read_all_lines(&self, path: &Path) -> Result<Vec<LogLine>> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogsieveError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LogsieveError::file_error(format!("stat {}", path.display()), e)
            }
        })?;
        if !metadata.is_file() {
            return Err(LogsieveError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            LogsieveError::file_error(format!("reading {}", path.display()), e)
        })?;
        Ok(split_lines(&bytes))
    }

    async fn read_range(&self, path: &Path, from: u64, to: u64) -> Result<Vec<u8>> {
        if to <= from {
            return Ok(Vec::new());
        }

        let mut file = File::open(path).await.map_err(|e| {
            LogsieveError::file_error(format!("opening {}", path.display()), e)
        })?;
        file.seek(SeekFrom::Start(from)).await.map_err(|e| {
            LogsieveError::file_error(format!("seeking in {}", path.display()), e)
        })?;

        let mut buf = Vec::with_capacity((to - from) as usize);
        // The file may have grown again since `to` was sampled; take() pins
        // the read to the range this notification covers.
        let mut limited = file.take(to - from);
        limited.read_to_end(&mut buf).await.map_err(|e| {
            LogsieveError::file_error(format!("reading range from {}", path.display()), e)
        })?;
        Ok(buf)
    }

    async fn file_size(&self, path: &Path) -> Result<u64> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            LogsieveError::file_error(format!("stat {}", path.display()), e)
        })?;
        Ok(metadata.len())
    }

    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}
