//! Shared helpers for outbound HTTP calls.
//!
//! Both the classifier and the language model go through these so that every
//! failure (connect, timeout, non-2xx, bad body) ends up as a [`CallFailure`].

use crate::error::CallFailure;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Build the shared HTTP client.
pub(crate) fn client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Apply an optional per-request timeout.
pub(crate) fn with_timeout(
    request: reqwest::RequestBuilder,
    timeout_ms: Option<u64>,
) -> reqwest::RequestBuilder {
    match timeout_ms {
        Some(ms) => request.timeout(Duration::from_millis(ms)),
        None => request,
    }
}

/// Send a request and reject any non-2xx status.
///
/// The response body of a failed request is included in the error, truncated
/// to keep user-facing messages short.
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, CallFailure> {
    let start = Instant::now();
    let resp = request.send().await?;

    let status = resp.status();
    tracing::debug!(
        url = %resp.url(),
        status = status.as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "HTTP response"
    );

    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(CallFailure::Status {
            status: status.as_u16(),
            body: truncate(text.trim(), 300),
        });
    }

    Ok(resp)
}

/// Read the whole body and parse it as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, CallFailure> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| CallFailure::MalformedBody(e.to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}
