//! In-memory price log for tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::application::ports::{PriceLog, StorageError};

/// Records every appended batch, including empty ones.
#[derive(Debug, Default)]
pub struct MemoryPriceLog {
    batches: Mutex<Vec<Vec<String>>>,
}

impl MemoryPriceLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of append calls received.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.batches.lock().len()
    }

    /// Every appended batch, in order.
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().clone()
    }

    /// Every appended line, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.batches.lock().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl PriceLog for MemoryPriceLog {
    async fn append(&self, lines: &[String]) -> Result<(), StorageError> {
        self.batches.lock().push(lines.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_batches_in_order() {
        let log = MemoryPriceLog::new();
        log.append(&["a".to_string(), "b".to_string()]).await.unwrap();
        log.append(&[]).await.unwrap();

        assert_eq!(log.flushes(), 2);
        assert_eq!(log.batches()[1], Vec::<String>::new());
        assert_eq!(log.lines(), vec!["a".to_string(), "b".to_string()]);
    }
}
