//! Route handler functions for all API endpoints.
//!
//! Handlers are stateless between calls. Bodies are parsed by hand rather
//! than with the `Json` extractor so that any malformed or incomplete body
//! maps to a plain 400, whatever the Content-Type.

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use waypost_core::error::WaypostError;
use waypost_notify::Notification;

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned by successful mutating calls.
pub const SUCCESS: &str = "success";

// =============================================================================
// Request types
// =============================================================================

/// Request body for POST /puturl.
#[derive(Debug, Deserialize)]
pub struct SaveUrlRequest {
    pub tag: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct GetUrlParams {
    pub tag: Option<String>,
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /ip - echo the caller's address without the port.
pub async fn ip(ConnectInfo(addr): ConnectInfo<SocketAddr>) -> String {
    addr.ip().to_canonical().to_string()
}

/// POST /notify - forward `{level, body}` to the notification relay.
pub async fn notify(State(state): State<AppState>, body: Bytes) -> Result<&'static str, ApiError> {
    let notification: Notification = parse_body(&body)?;
    if notification.level.is_empty() || notification.body.is_empty() {
        return Err(ApiError::BadRequest("Invalid request body".to_string()));
    }

    state.relay.relay(&notification).await.map_err(|e| {
        tracing::error!(error = %e, level = %notification.level, "Notification relay failed");
        ApiError::Internal(format!("RequestFailed: {}", e))
    })?;

    Ok(SUCCESS)
}

/// POST /puturl - store a new tag-to-URL entry.
///
/// Field contents are not validated; empty strings are stored as given.
pub async fn put_url(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let req: SaveUrlRequest = parse_body(&body)?;

    match state.tags.save(&req.tag, &req.url) {
        Ok(id) => {
            tracing::info!(tag = %req.tag, id, "Entry saved");
            Ok(SUCCESS)
        }
        Err(e @ WaypostError::DuplicateTag(_)) => {
            tracing::warn!(tag = %req.tag, "Rejected duplicate tag");
            Err(ApiError::Internal(format!("Failed to save data: {}", e)))
        }
        Err(e) => {
            tracing::error!(error = %e, tag = %req.tag, "Failed to save entry");
            Err(ApiError::Internal("Failed to save data".to_string()))
        }
    }
}

/// GET /geturl?tag=X - redirect (302) to the URL stored for `tag`.
pub async fn get_url(
    State(state): State<AppState>,
    Query(params): Query<GetUrlParams>,
) -> Result<Response, ApiError> {
    let tag = match params.tag {
        Some(tag) if !tag.is_empty() => tag,
        _ => return Err(ApiError::BadRequest("Tag is required".to_string())),
    };

    let url = state.tags.lookup(&tag).map_err(|e| match e {
        WaypostError::NotFound(_) => {
            ApiError::NotFound("No URL found for the given tag".to_string())
        }
        other => {
            tracing::error!(error = %other, tag = %tag, "Failed to retrieve entry");
            ApiError::Internal("Failed to retrieve data".to_string())
        }
    })?;

    let location = HeaderValue::from_str(&redirect_target(&url)).map_err(|e| {
        tracing::error!(error = %e, tag = %tag, "Stored URL is not a valid Location header");
        ApiError::Internal("Failed to retrieve data".to_string())
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Resolve a stored URL into a `Location` value.
///
/// Absolute URLs (with a scheme or a `//host` prefix) pass through. Anything
/// else is taken relative to the site root, so an empty URL redirects to `/`.
fn redirect_target(url: &str) -> String {
    if has_scheme(url) || url.starts_with("//") || url.starts_with('/') {
        url.to_string()
    } else {
        format!("/{}", url)
    }
}

/// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) followed by `:`.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Fallback for unsupported methods on known paths.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
