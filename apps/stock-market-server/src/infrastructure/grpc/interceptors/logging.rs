//! Call logging.

use tonic::metadata::{KeyAndValueRef, MetadataMap};
use tracing::info;

use super::{AUTHORIZATION_HEADER, CallState, InboundCall, Interceptor};
use crate::domain::error::ServiceError;

/// Logs the call kind, method and every inbound header except the
/// credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn intercept(&self, call: &InboundCall<'_>, _state: &mut CallState) -> Result<(), ServiceError> {
        info!(
            kind = %call.kind(),
            method = call.method(),
            "Starting call. Type: {}. Method: {}",
            call.kind(),
            call.method()
        );

        for (key, value) in loggable_headers(call.metadata()) {
            info!(header = %key, value = %value, "Header");
        }

        Ok(())
    }
}

/// Headers as they are logged: `authorization` removed, binary values
/// replaced by their decoded length.
#[must_use]
pub fn loggable_headers(metadata: &MetadataMap) -> Vec<(String, String)> {
    metadata
        .iter()
        .filter_map(|entry| match entry {
            KeyAndValueRef::Ascii(key, value) => {
                if key.as_str() == AUTHORIZATION_HEADER {
                    return None;
                }
                let shown = value
                    .to_str()
                    .map_or_else(|_| "<non-printable>".to_string(), str::to_string);
                Some((key.as_str().to_string(), shown))
            }
            KeyAndValueRef::Binary(key, value) => {
                let shown = value.to_bytes().map_or_else(
                    |_| "<invalid base64>".to_string(),
                    |bytes| format!("<{} bytes>", bytes.len()),
                );
                Some((key.as_str().to_string(), shown))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tonic::metadata::MetadataValue;

    use super::*;
    use crate::application::session::CallKind;

    #[test]
    fn authorization_is_never_logged() {
        let mut md = MetadataMap::new();
        md.insert("authorization", "Bearer secret".parse().unwrap());
        md.insert("x-trace-id", "t-1".parse().unwrap());

        let headers = loggable_headers(&md);

        assert_eq!(headers, vec![("x-trace-id".to_string(), "t-1".to_string())]);
        assert!(!format!("{headers:?}").contains("secret"));
    }

    #[test]
    fn binary_headers_logged_by_length() {
        let mut md = MetadataMap::new();
        md.insert_bin("payload-bin", MetadataValue::from_bytes(&[1, 2, 3, 4]));

        assert_eq!(
            loggable_headers(&md),
            vec![("payload-bin".to_string(), "<4 bytes>".to_string())]
        );
    }

    #[test]
    fn logging_never_rejects() {
        let md = MetadataMap::new();
        let call = InboundCall::new(CallKind::Unary, "/svc/Method", &md);
        let mut state = CallState::default();

        assert!(LoggingInterceptor.intercept(&call, &mut state).is_ok());
        assert!(state.trace_id.is_none());
    }
}
