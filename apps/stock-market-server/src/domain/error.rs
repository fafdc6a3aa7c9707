//! Structured error model for the stock price service.
//!
//! Every failure the service reports is a [`ServiceError`]: a kind that maps
//! onto a gRPC status code, a human-readable message and, for
//! `InvalidArgument` / `FailedPrecondition`, a list of machine-parseable
//! [`ErrorDetail`] entries. Details travel as `google.rpc.BadRequest` and
//! `google.rpc.PreconditionFailure` inside `grpc-status-details-bin`, so
//! callers can rebuild the full error without string parsing.
//!
//! # gRPC Status Codes
//!
//! | Kind | Code | Retry |
//! |------|------|-------|
//! | `Unauthenticated` | `UNAUTHENTICATED` (16) | never |
//! | `InvalidArgument` | `INVALID_ARGUMENT` (3) | after correcting the request |
//! | `FailedPrecondition` | `FAILED_PRECONDITION` (9) | after the condition changes |
//! | `Unavailable` | `UNAVAILABLE` (14) | with backoff |
//! | `Internal` | `INTERNAL` (13) | with backoff |
//! | `Aborted` | `ABORTED` (10) | with backoff |
//! | `Unknown` | `UNKNOWN` (2) | with backoff |
//! | `Cancelled` | `CANCELLED` (1) | not automatically |

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonic::Code;
use tonic_types::{ErrorDetails, StatusExt};

/// Failure categories understood by the service and its callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Missing or empty credential.
    Unauthenticated,
    /// One or more request fields are invalid.
    InvalidArgument,
    /// An environmental rule blocks the call (e.g. market closed).
    FailedPrecondition,
    /// Service temporarily unavailable.
    Unavailable,
    /// Unexpected server-side failure.
    Internal,
    /// Operation aborted due to a conflict.
    Aborted,
    /// Unclassified failure.
    Unknown,
    /// Deadline exceeded or caller-initiated cancellation.
    Cancelled,
}

/// How a caller should treat a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryAdvice {
    /// Retrying cannot succeed.
    Never,
    /// Fix the request and resubmit; never retry as-is.
    AfterCorrection,
    /// Retry once the blocking condition has changed.
    AfterConditionChange,
    /// Transient; retry with backoff.
    WithBackoff,
}

impl ErrorKind {
    /// Get the gRPC status code for this kind.
    #[must_use]
    pub const fn grpc_code(self) -> Code {
        match self {
            Self::Unauthenticated => Code::Unauthenticated,
            Self::InvalidArgument => Code::InvalidArgument,
            Self::FailedPrecondition => Code::FailedPrecondition,
            Self::Unavailable => Code::Unavailable,
            Self::Internal => Code::Internal,
            Self::Aborted => Code::Aborted,
            Self::Unknown => Code::Unknown,
            Self::Cancelled => Code::Cancelled,
        }
    }

    /// Map a gRPC status code back to a kind.
    ///
    /// Codes outside the service taxonomy collapse into the closest kind:
    /// `DEADLINE_EXCEEDED` is a cancellation, everything else unknown.
    #[must_use]
    pub const fn from_grpc_code(code: Code) -> Self {
        match code {
            Code::Unauthenticated => Self::Unauthenticated,
            Code::InvalidArgument => Self::InvalidArgument,
            Code::FailedPrecondition => Self::FailedPrecondition,
            Code::Unavailable => Self::Unavailable,
            Code::Internal => Self::Internal,
            Code::Aborted => Self::Aborted,
            Code::Cancelled | Code::DeadlineExceeded => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    /// Whether this kind carries structured details.
    #[must_use]
    pub const fn carries_details(self) -> bool {
        matches!(self, Self::InvalidArgument | Self::FailedPrecondition)
    }

    /// Retry guidance for this kind.
    #[must_use]
    pub const fn retry_advice(self) -> RetryAdvice {
        match self {
            Self::Unauthenticated | Self::Cancelled => RetryAdvice::Never,
            Self::InvalidArgument => RetryAdvice::AfterCorrection,
            Self::FailedPrecondition => RetryAdvice::AfterConditionChange,
            Self::Unavailable | Self::Internal | Self::Aborted | Self::Unknown => {
                RetryAdvice::WithBackoff
            }
        }
    }

    /// Stable upper-case name, as used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::Unavailable => "UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::Aborted => "ABORTED",
            Self::Unknown => "UNKNOWN",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured, machine-parseable failure detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum ErrorDetail {
    /// An invalid request field.
    FieldViolation {
        /// Name of the offending field.
        field: String,
        /// Why the value was rejected.
        description: String,
    },
    /// An environmental rule blocking the call.
    PreconditionViolation {
        /// Rule identifier, e.g. `INVALID_OPERATION_TIME`.
        #[serde(rename = "type")]
        kind: String,
        /// What the rule applies to.
        subject: String,
        /// Why the call was blocked.
        description: String,
    },
}

impl ErrorDetail {
    /// Build a field violation.
    #[must_use]
    pub fn field(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self::FieldViolation {
            field: field.into(),
            description: description.into(),
        }
    }

    /// Build a precondition violation.
    #[must_use]
    pub fn precondition(
        kind: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::PreconditionViolation {
            kind: kind.into(),
            subject: subject.into(),
            description: description.into(),
        }
    }
}

/// A typed service failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ServiceError {
    kind: ErrorKind,
    message: String,
    details: Vec<ErrorDetail>,
}

impl ServiceError {
    /// Create an error carrying a message only.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Create an error with structured details.
    ///
    /// Details are kept only for kinds that carry them
    /// (`InvalidArgument`, `FailedPrecondition`); other kinds drop them.
    #[must_use]
    pub fn fail(
        kind: ErrorKind,
        message: impl Into<String>,
        details: impl IntoIterator<Item = ErrorDetail>,
    ) -> Self {
        let details = if kind.carries_details() {
            details.into_iter().collect()
        } else {
            Vec::new()
        };
        Self {
            kind,
            message: message.into(),
            details,
        }
    }

    /// Get the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured details.
    #[must_use]
    pub fn details(&self) -> &[ErrorDetail] {
        &self.details
    }

    /// Convert to a tonic Status with rich error details.
    #[must_use]
    pub fn to_status(&self) -> tonic::Status {
        if self.details.is_empty() {
            return tonic::Status::new(self.kind.grpc_code(), &self.message);
        }

        let mut details = ErrorDetails::new();
        for detail in &self.details {
            match detail {
                ErrorDetail::FieldViolation { field, description } => {
                    details.add_bad_request_violation(field, description);
                }
                ErrorDetail::PreconditionViolation {
                    kind,
                    subject,
                    description,
                } => {
                    details.add_precondition_failure_violation(kind, subject, description);
                }
            }
        }

        tonic::Status::with_error_details(self.kind.grpc_code(), &self.message, details)
    }

    /// Rebuild a service error from a received status.
    #[must_use]
    pub fn from_status(status: &tonic::Status) -> Self {
        let kind = ErrorKind::from_grpc_code(status.code());
        let rich = status.get_error_details();

        let mut details = Vec::new();
        if let Some(bad_request) = rich.bad_request() {
            details.extend(
                bad_request
                    .field_violations
                    .iter()
                    .map(|v| ErrorDetail::field(v.field.clone(), v.description.clone())),
            );
        }
        if let Some(failure) = rich.precondition_failure() {
            details.extend(failure.violations.iter().map(|v| {
                ErrorDetail::precondition(
                    v.r#type.clone(),
                    v.subject.clone(),
                    v.description.clone(),
                )
            }));
        }

        Self::fail(kind, status.message(), details)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if !self.details.is_empty() {
            write!(f, " ({} detail(s))", self.details.len())?;
        }
        Ok(())
    }
}

impl From<ServiceError> for tonic::Status {
    fn from(error: ServiceError) -> Self {
        error.to_status()
    }
}

/// Convenience constructors for common errors.
impl ServiceError {
    /// Missing or empty credential.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// Invalid request fields.
    #[must_use]
    pub fn invalid_argument(
        message: impl Into<String>,
        violations: impl IntoIterator<Item = ErrorDetail>,
    ) -> Self {
        Self::fail(ErrorKind::InvalidArgument, message, violations)
    }

    /// Environmental rule blocking the call.
    #[must_use]
    pub fn failed_precondition(message: impl Into<String>, violation: ErrorDetail) -> Self {
        Self::fail(ErrorKind::FailedPrecondition, message, [violation])
    }

    /// Call cancelled or deadline unusable.
    #[must_use]
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Unexpected server-side failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

/// A received error, classified for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// The status carried structured details.
    Structured(ServiceError),
    /// The status carried a code and message only.
    Bare {
        /// Status kind.
        kind: ErrorKind,
        /// Status message.
        message: String,
    },
}

impl StatusReport {
    /// Classify a received status.
    #[must_use]
    pub fn from_status(status: &tonic::Status) -> Self {
        let error = ServiceError::from_status(status);
        if error.details().is_empty() {
            Self::Bare {
                kind: error.kind(),
                message: error.message,
            }
        } else {
            Self::Structured(error)
        }
    }

    /// Whether structured details were present.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }
}

#[derive(Serialize)]
struct StructuredView<'a> {
    code: ErrorKind,
    message: &'a str,
    details: &'a [ErrorDetail],
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(error) => {
                let view = StructuredView {
                    code: error.kind(),
                    message: error.message(),
                    details: error.details(),
                };
                let json = serde_json::to_string_pretty(&view).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            Self::Bare { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}
