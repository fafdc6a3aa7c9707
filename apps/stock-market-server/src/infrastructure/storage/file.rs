//! Append-only file log.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::application::ports::{PriceLog, StorageError};
use crate::infrastructure::metrics;

/// Appends batches to a file, one record per line.
///
/// Appends are serialized process-wide, and each batch is written with a
/// single `write_all` followed by `sync_data`, so lines from concurrent calls
/// never interleave.
#[derive(Debug)]
pub struct FilePriceLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePriceLog {
    /// Create a log appending to `path`. The file is created on first flush.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PriceLog for FilePriceLog {
    async fn append(&self, lines: &[String]) -> Result<(), StorageError> {
        let started = Instant::now();

        let mut buffer = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            buffer.push_str(line);
            buffer.push('\n');
        }

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;

        metrics::record_batch_flushed(started.elapsed());
        tracing::debug!(path = %self.path.display(), records = lines.len(), "Batch appended");
        Ok(())
    }
}
