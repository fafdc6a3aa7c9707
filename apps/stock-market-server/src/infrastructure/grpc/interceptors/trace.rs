//! Trace id propagation.

use tonic::metadata::MetadataValue;
use uuid::Uuid;

use super::{CallState, InboundCall, Interceptor};
use crate::domain::error::ServiceError;

/// Header carrying the correlation id, inbound and outbound.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Echoes the caller's `x-trace-id`, or assigns a fresh UUID v4 when the
/// header is absent or empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceIdInterceptor;

impl Interceptor for TraceIdInterceptor {
    fn name(&self) -> &'static str {
        "trace-id"
    }

    fn intercept(&self, call: &InboundCall<'_>, state: &mut CallState) -> Result<(), ServiceError> {
        let inbound = call
            .metadata()
            .get(TRACE_ID_HEADER)
            .filter(|v| v.to_str().is_ok_and(|s| !s.trim().is_empty()));

        let (trace_id, value) = if let Some(value) = inbound {
            let id = value.to_str().unwrap_or_default().to_string();
            (id, value.clone())
        } else {
            let id = Uuid::new_v4().to_string();
            let value = MetadataValue::try_from(id.as_str())
                .map_err(|_| ServiceError::internal("Failed to encode trace id"))?;
            (id, value)
        };

        tracing::debug!(trace_id = %trace_id, method = call.method(), "Trace id assigned");
        state.outbound.insert(TRACE_ID_HEADER, value);
        state.trace_id = Some(trace_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tonic::metadata::MetadataMap;

    use super::*;
    use crate::application::session::CallKind;

    fn run(md: &MetadataMap) -> CallState {
        let call = InboundCall::new(CallKind::Unary, "/svc/Method", md);
        let mut state = CallState::default();
        TraceIdInterceptor.intercept(&call, &mut state).unwrap();
        state
    }

    #[test]
    fn inbound_id_is_echoed() {
        let mut md = MetadataMap::new();
        md.insert(TRACE_ID_HEADER, "client-trace-42".parse().unwrap());

        let state = run(&md);

        assert_eq!(state.trace_id.as_deref(), Some("client-trace-42"));
        assert_eq!(state.outbound.get(TRACE_ID_HEADER).unwrap(), "client-trace-42");
    }

    #[test]
    fn missing_id_is_generated_fresh() {
        let md = MetadataMap::new();

        let first = run(&md).trace_id.unwrap();
        let second = run(&md).trace_id.unwrap();

        assert!(Uuid::parse_str(&first).is_ok());
        assert_ne!(first, second);
    }

    #[test]
    fn empty_id_is_replaced() {
        let mut md = MetadataMap::new();
        md.insert(TRACE_ID_HEADER, "  ".parse().unwrap());

        let state = run(&md);

        assert!(Uuid::parse_str(state.trace_id.as_deref().unwrap()).is_ok());
    }
}
