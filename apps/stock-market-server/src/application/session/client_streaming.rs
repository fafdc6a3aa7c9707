//! Client-streaming batched ingestion.
//!
//! Accumulating -> (Flushing)* -> Finalizing -> Responded. Accepted updates
//! are serialized into a [`Batch`]; whenever the batch reaches the flush
//! threshold it is appended to the durable log and cleared. When the inbound
//! stream ends the remaining batch is flushed, even if empty, so a call with
//! `N` accepted updates issues `N / threshold + 1` flushes.

use std::mem;

use chrono::Utc;
use futures::{Stream, StreamExt};
use tracing::{debug, info};

use super::{CallContext, StreamingLimits};
use crate::application::ports::{PriceLog, StorageError};
use crate::application::services::PriceService;
use crate::domain::error::ServiceError;
use crate::domain::quote::PriceUpdate;

/// In-memory buffer of serialized accepted updates.
///
/// Holds at most `threshold` lines; the owner must flush a full batch
/// before pushing again.
#[derive(Debug)]
pub struct Batch {
    lines: Vec<String>,
    threshold: usize,
}

impl Batch {
    /// Create an empty batch. A threshold of zero is treated as one.
    #[must_use]
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            lines: Vec::with_capacity(threshold),
            threshold,
        }
    }

    /// Append a serialized record.
    pub fn push(&mut self, line: String) {
        debug_assert!(!self.is_full(), "batch pushed past its threshold");
        self.lines.push(line);
    }

    /// Whether the batch has reached its threshold.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.threshold
    }

    /// Number of buffered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Take the buffered records, leaving the batch empty.
    pub fn take(&mut self) -> Vec<String> {
        mem::replace(&mut self.lines, Vec::with_capacity(self.threshold))
    }
}

/// Result of a completed ingestion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Updates accepted and persisted.
    pub accepted: u32,
    /// Append calls issued against the durable log.
    pub flushes: u32,
}

impl IngestSummary {
    /// Human-readable response message.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} updated stocks!", self.accepted)
    }
}

/// Consume `inbound`, validating and persisting every update.
///
/// # Errors
///
/// Aborts the whole call with the first failure: an inbound stream error,
/// a pre-condition or validation failure, a storage failure (`Internal`),
/// or `Cancelled` if the call is cancelled. Cancellation never flushes the
/// in-flight batch.
pub async fn ingest_updates<S>(
    ctx: &CallContext,
    prices: &PriceService,
    log: &dyn PriceLog,
    limits: &StreamingLimits,
    mut inbound: S,
) -> Result<IngestSummary, ServiceError>
where
    S: Stream<Item = Result<PriceUpdate, ServiceError>> + Unpin,
{
    let mut batch = Batch::new(limits.flush_threshold);
    let mut summary = IngestSummary {
        accepted: 0,
        flushes: 0,
    };

    loop {
        let next = tokio::select! {
            biased;
            () = ctx.cancelled() => return Err(cancelled(ctx, &batch)),
            next = inbound.next() => next,
        };
        let Some(update) = next else {
            break;
        };

        let update = update?;
        prices.ensure_market_open(Utc::now())?;
        let accepted = update.validate()?;

        info!(
            trace_id = ctx.trace_id(),
            symbol = %accepted.symbol,
            price = %accepted.price,
            "New price for {}",
            accepted.symbol
        );

        let line = accepted.to_log_line().map_err(StorageError::from)?;
        if ctx.is_cancelled() {
            return Err(cancelled(ctx, &batch));
        }
        batch.push(line);
        summary.accepted += 1;

        if batch.is_full() {
            info!(trace_id = ctx.trace_id(), records = batch.len(), "Saving batch");
            log.append(&batch.take()).await?;
            summary.flushes += 1;
        }
    }

    if ctx.is_cancelled() {
        return Err(cancelled(ctx, &batch));
    }
    log.append(&batch.take()).await?;
    summary.flushes += 1;

    info!(
        trace_id = ctx.trace_id(),
        accepted = summary.accepted,
        flushes = summary.flushes,
        "Price updates ingested"
    );
    Ok(summary)
}

fn cancelled(ctx: &CallContext, batch: &Batch) -> ServiceError {
    debug!(
        trace_id = ctx.trace_id(),
        dropped = batch.len(),
        "Ingestion cancelled before flush"
    );
    ServiceError::cancelled("Call cancelled by the client.")
}
