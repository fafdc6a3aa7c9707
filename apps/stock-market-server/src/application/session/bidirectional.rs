//! Bidirectional quote exchange.
//!
//! Each inbound symbol yields exactly one quote, pushed before the next
//! symbol is read, so responses pair with requests in order.

use futures::{Stream, StreamExt};
use tracing::{debug, info};

use super::{CallContext, QuoteSink};
use crate::application::services::PriceService;
use crate::domain::error::ServiceError;

/// Answer every inbound symbol with one quote, in order.
///
/// Returns the number of quotes pushed. Ends without error when the inbound
/// stream ends, the call is cancelled, or the receiver goes away.
///
/// # Errors
///
/// Returns an inbound stream error or a price-service failure.
pub async fn exchange_quotes<S>(
    ctx: &CallContext,
    prices: &PriceService,
    mut inbound: S,
    sink: &QuoteSink,
) -> Result<u32, ServiceError>
where
    S: Stream<Item = Result<String, ServiceError>> + Unpin,
{
    let mut answered = 0;

    loop {
        let next = tokio::select! {
            biased;
            () = ctx.cancelled() => {
                debug!(trace_id = ctx.trace_id(), answered, "Exchange cancelled");
                break;
            }
            next = inbound.next() => next,
        };
        let Some(symbol) = next else {
            break;
        };

        let symbol = symbol?;
        let quote = prices.quote(&symbol)?;
        if ctx.is_cancelled() || !sink.push(quote).await {
            break;
        }
        answered += 1;
    }

    info!(trace_id = ctx.trace_id(), answered, "Quote exchange closed");
    Ok(answered)
}
