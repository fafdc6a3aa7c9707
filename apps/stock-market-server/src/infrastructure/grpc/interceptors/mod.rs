//! Call Interceptor Chain
//!
//! Ordered middleware run before every handler, identically for all four
//! call shapes. Each interceptor sees a read-only [`InboundCall`] and a
//! mutable [`CallState`]; the first failure stops the chain and the handler
//! never runs.
//!
//! Default order ([`InterceptorChain::standard`]):
//!
//! 1. [`LoggingInterceptor`] - call kind, method and (redacted) headers
//! 2. [`TraceIdInterceptor`] - echo or assign `x-trace-id`
//! 3. [`AuthInterceptor`] - require a non-empty `authorization` header
//!
//! Outbound metadata collected by the chain (the trace id) is returned with
//! both outcomes so the adapter can attach it to the response headers on
//! success or to the status trailers on failure.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tonic::Status;
use tonic::metadata::MetadataMap;
use uuid::Uuid;

use crate::application::session::{CallContext, CallKind};
use crate::domain::error::ServiceError;

mod auth;
mod logging;
mod trace;

pub use auth::{AUTHORIZATION_HEADER, AuthInterceptor};
pub use logging::{LoggingInterceptor, loggable_headers};
pub use trace::{TRACE_ID_HEADER, TraceIdInterceptor};

/// Header carrying the caller's timeout.
pub const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

// =============================================================================
// Call View and State
// =============================================================================

/// Read-only view of an inbound call.
#[derive(Debug, Clone, Copy)]
pub struct InboundCall<'a> {
    kind: CallKind,
    method: &'a str,
    metadata: &'a MetadataMap,
}

impl<'a> InboundCall<'a> {
    /// Create a call view.
    #[must_use]
    pub const fn new(kind: CallKind, method: &'a str, metadata: &'a MetadataMap) -> Self {
        Self {
            kind,
            method,
            metadata,
        }
    }

    /// Call shape.
    #[must_use]
    pub const fn kind(&self) -> CallKind {
        self.kind
    }

    /// Fully-qualified method name.
    #[must_use]
    pub const fn method(&self) -> &'a str {
        self.method
    }

    /// Inbound request metadata.
    #[must_use]
    pub const fn metadata(&self) -> &'a MetadataMap {
        self.metadata
    }
}

/// State accumulated while the chain runs.
#[derive(Debug, Default)]
pub struct CallState {
    /// Trace id assigned or echoed by the trace interceptor.
    pub trace_id: Option<String>,
    /// Set by the authentication interceptor.
    pub authenticated: bool,
    /// Metadata to send back to the caller.
    pub outbound: MetadataMap,
}

// =============================================================================
// Interceptor Trait
// =============================================================================

/// A single piece of call middleware.
pub trait Interceptor: Send + Sync {
    /// Short name, for logs.
    fn name(&self) -> &'static str;

    /// Inspect the call and update its state.
    ///
    /// # Errors
    ///
    /// Returns a `ServiceError` to reject the call.
    fn intercept(&self, call: &InboundCall<'_>, state: &mut CallState) -> Result<(), ServiceError>;
}

// =============================================================================
// Chain
// =============================================================================

/// A call that passed the chain.
#[derive(Debug)]
pub struct Admitted {
    /// Correlation state for the handler.
    pub context: CallContext,
    /// Metadata to attach to the response.
    pub outbound: MetadataMap,
}

/// A call rejected by the chain.
#[derive(Debug)]
pub struct Rejected {
    /// Why the call was rejected.
    pub error: ServiceError,
    /// Metadata collected before the rejection.
    pub outbound: MetadataMap,
}

impl Rejected {
    /// Convert to a status carrying the collected metadata.
    #[must_use]
    pub fn into_status(self) -> Status {
        with_metadata(self.error.to_status(), &self.outbound)
    }
}

/// Ordered interceptor pipeline.
pub struct InterceptorChain {
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("interceptors", &self.names())
            .finish()
    }
}

impl Default for InterceptorChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl InterceptorChain {
    /// Build a chain from interceptors, run in the given order.
    #[must_use]
    pub fn new(interceptors: Vec<Box<dyn Interceptor>>) -> Self {
        Self { interceptors }
    }

    /// Logging, then trace id, then authentication.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(LoggingInterceptor),
            Box::new(TraceIdInterceptor),
            Box::new(AuthInterceptor),
        ])
    }

    /// Interceptor names, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Run every interceptor against `state`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first interceptor failure.
    pub fn run(&self, call: &InboundCall<'_>, state: &mut CallState) -> Result<(), ServiceError> {
        for interceptor in &self.interceptors {
            if let Err(error) = interceptor.intercept(call, state) {
                tracing::warn!(
                    interceptor = interceptor.name(),
                    method = call.method(),
                    code = %error.kind(),
                    reason = error.message(),
                    "Call rejected"
                );
                return Err(error);
            }
        }
        Ok(())
    }

    /// Run the chain and build the call context.
    ///
    /// The context always carries a non-empty trace id; if no interceptor
    /// assigned one, a local id is generated but not advertised.
    ///
    /// # Errors
    ///
    /// Returns the rejection together with any metadata collected so far.
    pub fn admit(&self, call: &InboundCall<'_>) -> Result<Admitted, Rejected> {
        let mut state = CallState::default();
        if let Err(error) = self.run(call, &mut state) {
            return Err(Rejected {
                error,
                outbound: state.outbound,
            });
        }

        let trace_id = state
            .trace_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let deadline = call
            .metadata()
            .get(GRPC_TIMEOUT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_grpc_timeout)
            .map(|timeout| Instant::now() + timeout);

        let context = CallContext::new(call.method(), call.kind(), trace_id)
            .with_authenticated(state.authenticated)
            .with_deadline(deadline);

        Ok(Admitted {
            context,
            outbound: state.outbound,
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Copy `metadata` into a status's metadata.
#[must_use]
pub fn with_metadata(mut status: Status, metadata: &MetadataMap) -> Status {
    merge_metadata(status.metadata_mut(), metadata);
    status
}

/// Copy every ASCII entry of `from` into `into`.
pub fn merge_metadata(into: &mut MetadataMap, from: &MetadataMap) {
    for entry in from.iter() {
        if let tonic::metadata::KeyAndValueRef::Ascii(key, value) = entry {
            into.insert(key.clone(), value.clone());
        }
    }
}

/// Parse a `grpc-timeout` header value (`<digits><unit>`).
///
/// Units: `H` hours, `M` minutes, `S` seconds, `m` milliseconds,
/// `u` microseconds, `n` nanoseconds. At most eight digits.
#[must_use]
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.len() < 2 || !value.is_ascii() {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    match unit {
        "H" => Some(Duration::from_secs(amount * 3600)),
        "M" => Some(Duration::from_secs(amount * 60)),
        "S" => Some(Duration::from_secs(amount)),
        "m" => Some(Duration::from_millis(amount)),
        "u" => Some(Duration::from_micros(amount)),
        "n" => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
