//! Market-hours policy.

use chrono::{DateTime, NaiveTime, Utc};

use super::error::{ErrorDetail, ServiceError};

/// Precondition type reported when the market is closed.
pub const INVALID_OPERATION_TIME: &str = "INVALID_OPERATION_TIME";

/// Precondition subject reported when the market is closed.
pub const MARKET_SUBJECT: &str = "Stock Market";

/// When the market accepts operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketHours {
    /// No time restriction.
    #[default]
    AlwaysOpen,
    /// Open between `open` and `close` (inclusive), UTC.
    Window {
        /// Opening time, UTC.
        open: NaiveTime,
        /// Closing time, UTC.
        close: NaiveTime,
    },
}

impl MarketHours {
    /// Check whether the market is open at `now`.
    ///
    /// # Errors
    ///
    /// Returns `FailedPrecondition` with an `INVALID_OPERATION_TIME`
    /// violation when `now` falls outside the window.
    pub fn ensure_open(&self, now: DateTime<Utc>) -> Result<(), ServiceError> {
        let Self::Window { open, close } = *self else {
            return Ok(());
        };

        let time = now.time();
        if time < open || time > close {
            return Err(ServiceError::failed_precondition(
                "The stock market is closed!",
                ErrorDetail::precondition(
                    INVALID_OPERATION_TIME,
                    MARKET_SUBJECT,
                    format!(
                        "The market only operates between {} and {} UTC.",
                        open.format("%H:%M"),
                        close.format("%H:%M")
                    ),
                ),
            ));
        }

        Ok(())
    }
}
