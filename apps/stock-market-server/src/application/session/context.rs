//! Per-call correlation state.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// RPC call shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// One request, one response.
    Unary,
    /// One request, a stream of responses.
    ServerStreaming,
    /// A stream of requests, one response.
    ClientStreaming,
    /// Streams in both directions.
    DuplexStreaming,
}

impl CallKind {
    /// Get the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unary => "Unary",
            Self::ServerStreaming => "ServerStreaming",
            Self::ClientStreaming => "ClientStreaming",
            Self::DuplexStreaming => "DuplexStreaming",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlation state for one admitted call.
///
/// Built once the interceptor chain passes. The trace id is never empty.
/// Controllers read it and may only request cancellation.
#[derive(Debug, Clone)]
pub struct CallContext {
    method: String,
    kind: CallKind,
    trace_id: String,
    authenticated: bool,
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl CallContext {
    /// Create a context with no deadline and a fresh cancellation token.
    #[must_use]
    pub fn new(method: impl Into<String>, kind: CallKind, trace_id: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            kind,
            trace_id: trace_id.into(),
            authenticated: false,
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Set an absolute deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set a deadline relative to now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Some(Instant::now() + timeout))
    }

    /// Mark the call as authenticated.
    #[must_use]
    pub const fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    /// Use an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Fully-qualified method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Call shape.
    #[must_use]
    pub const fn kind(&self) -> CallKind {
        self.kind
    }

    /// Trace id for correlation.
    #[must_use]
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Whether the authentication interceptor admitted the call.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Absolute deadline, if the caller set one.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Get a handle to the cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request cancellation of the call.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the call has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait until the call is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}
