//! Shared HTTP helpers.

use reqwest::{RequestBuilder, Response};
use seeker_core::{Result, SeekerError};

/// Turns a non-2xx response into a `Transport` error carrying the status
/// and body text.
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(SeekerError::transport(
        Some(status.as_u16()),
        format!("HTTP {}: {}", status, body.trim()),
    ))
}

pub(crate) fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}
