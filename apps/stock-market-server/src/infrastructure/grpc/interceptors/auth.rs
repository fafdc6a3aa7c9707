//! Credential presence check.

use super::{CallState, InboundCall, Interceptor};
use crate::domain::error::ServiceError;

/// Header carrying the caller's credential.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Rejects calls without a non-empty `authorization` header.
///
/// Only presence is checked; the token itself is not validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthInterceptor;

impl Interceptor for AuthInterceptor {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn intercept(&self, call: &InboundCall<'_>, state: &mut CallState) -> Result<(), ServiceError> {
        let present = call
            .metadata()
            .get(AUTHORIZATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|token| !token.trim().is_empty());

        if !present {
            return Err(ServiceError::unauthenticated("Invalid token!"));
        }

        state.authenticated = true;
        Ok(())
    }
}
