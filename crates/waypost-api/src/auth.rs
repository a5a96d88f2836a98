//! Shared-secret authentication.
//!
//! Mutating routes require a request header, whose name is configurable,
//! carrying exactly the configured secret. There are no sessions and no
//! per-user identity.

use axum::extract::{Request, State};
use axum::http::HeaderName;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use waypost_core::error::WaypostError;

use crate::error::ApiError;
use crate::state::AppState;

/// Compares a presented credential against the configured secret.
#[derive(Debug, Clone)]
pub struct AuthGate {
    header: HeaderName,
    secret: String,
}

impl AuthGate {
    /// Build a gate reading `header` and expecting `secret`.
    pub fn new(header: &str, secret: &str) -> Result<Self, WaypostError> {
        let header = HeaderName::from_bytes(header.as_bytes()).map_err(|e| {
            WaypostError::Config(format!("Invalid authheader '{}': {}", header, e))
        })?;
        Ok(Self {
            header,
            secret: secret.to_string(),
        })
    }

    /// Name of the header carrying the credential.
    pub fn header_name(&self) -> &HeaderName {
        &self.header
    }

    /// Accept only a non-empty value exactly equal to the secret.
    ///
    /// Plain string equality: case-sensitive, no hashing.
    pub fn authorize(&self, presented: Option<&str>) -> Result<(), ApiError> {
        match presented {
            Some(value) if !value.is_empty() && value == self.secret => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// Middleware that rejects requests lacking the shared secret.
///
/// A header value that is not valid UTF-8 counts as absent.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let presented = req
        .headers()
        .get(state.auth.header_name())
        .and_then(|v| v.to_str().ok());

    match state.auth.authorize(presented) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            tracing::warn!(
                path = %req.uri().path(),
                header_present = presented.is_some(),
                "Rejected unauthorized request"
            );
            err.into_response()
        }
    }
}
