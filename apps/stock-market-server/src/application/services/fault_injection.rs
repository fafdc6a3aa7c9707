//! Fault Injection
//!
//! Fails requests 1-4 of every cycle of five with a different transient
//! error each, so client retry policies can be exercised end to end.

use parking_lot::Mutex;
use tracing::info;

use crate::domain::error::{ErrorKind, ServiceError};

/// Number of requests in one failure cycle (the last one succeeds).
pub const CYCLE_LEN: u32 = 5;

/// Deterministic, process-wide failure cycle.
#[derive(Debug, Default)]
pub struct FaultInjector {
    count: Mutex<u32>,
}

impl FaultInjector {
    /// Create an injector at the start of a cycle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the cycle by one request.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable`, `Internal`, `Aborted` or `Unknown` for requests
    /// one through four of the cycle.
    pub fn check(&self) -> Result<(), ServiceError> {
        let mut count = self.count.lock();
        *count += 1;
        let request = *count;

        let failure = match request {
            1 => Some((ErrorKind::Unavailable, "Unavailable Service!")),
            2 => Some((ErrorKind::Internal, "Internal Error!")),
            3 => Some((ErrorKind::Aborted, "Aborted with conflict!")),
            4 => Some((ErrorKind::Unknown, "Unknown Error!")),
            _ => None,
        };

        match failure {
            Some((kind, message)) => {
                info!(request, kind = %kind, "Injecting fault");
                Err(ServiceError::new(kind, message))
            }
            None => {
                *count = 0;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_fails_four_then_succeeds() {
        let injector = FaultInjector::new();

        let kinds: Vec<_> = (0..CYCLE_LEN)
            .map(|_| injector.check().err().map(|e| e.kind()))
            .collect();

        assert_eq!(
            kinds,
            vec![
                Some(ErrorKind::Unavailable),
                Some(ErrorKind::Internal),
                Some(ErrorKind::Aborted),
                Some(ErrorKind::Unknown),
                None,
            ]
        );
    }

    #[test]
    fn test_cycle_restarts_after_success() {
        let injector = FaultInjector::new();
        for _ in 0..CYCLE_LEN {
            let _ = injector.check();
        }

        let error = injector.check().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unavailable);
        assert_eq!(error.message(), "Unavailable Service!");
    }

    #[test]
    fn test_concurrent_callers_share_one_cycle() {
        let injector = std::sync::Arc::new(FaultInjector::new());
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let injector = std::sync::Arc::clone(&injector);
                std::thread::spawn(move || injector.check().is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 2);
    }
}
