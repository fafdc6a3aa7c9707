//! Server-streaming push loop.
//!
//! Open -> Emitting -> Closed. Quotes are pushed every
//! [`StreamingLimits::push_interval`] until the notification cap is reached,
//! the deadline margin is crossed, the call is cancelled, or the receiver
//! goes away.

use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use super::{CallContext, QuoteSink, StreamingLimits};
use crate::application::services::PriceService;
use crate::domain::error::ServiceError;

/// Push quotes for `symbol` into `sink` until a stop condition is met.
///
/// Returns the number of quotes pushed.
///
/// # Errors
///
/// Returns `Cancelled` ("Invalid Deadline Value!") without pushing anything
/// if the deadline is already at or before now. A price-service failure
/// stops the loop and is returned as-is.
pub async fn stream_quotes(
    ctx: &CallContext,
    prices: &PriceService,
    limits: &StreamingLimits,
    symbol: &str,
    sink: &QuoteSink,
) -> Result<u32, ServiceError> {
    let opened_at = Instant::now();
    if ctx.deadline().is_some_and(|deadline| deadline <= opened_at) {
        return Err(ServiceError::cancelled("Invalid Deadline Value!"));
    }

    // Pushing stops once now reaches deadline - margin.
    let cutoff = ctx.deadline().map(|deadline| {
        deadline
            .checked_sub(limits.deadline_margin)
            .unwrap_or(opened_at)
    });

    let mut emitted = 0;
    while emitted < limits.max_notifications {
        if ctx.is_cancelled() {
            debug!(trace_id = ctx.trace_id(), emitted, "Stream cancelled");
            break;
        }
        if cutoff.is_some_and(|cutoff| Instant::now() >= cutoff) {
            debug!(trace_id = ctx.trace_id(), emitted, "Deadline margin reached");
            break;
        }

        let quote = prices.quote(symbol)?;
        if ctx.is_cancelled() || !sink.push(quote).await {
            break;
        }
        emitted += 1;

        if emitted >= limits.max_notifications {
            break;
        }

        tokio::select! {
            biased;
            () = ctx.cancelled() => break,
            () = sleep(limits.push_interval) => {}
        }
    }

    info!(trace_id = ctx.trace_id(), symbol, emitted, "Price stream closed");
    Ok(emitted)
}
