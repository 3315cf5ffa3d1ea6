//! The single Messages API call and validation of its answer.

use std::time::Duration;

use tracing::debug;

use crate::api::config::{ANTHROPIC_VERSION, ApiConfig};
use crate::api::wire::{MessagesRequest, MessagesResponse};
use crate::error::ApiError;

/// Text the legacy shell hook emitted on failure; never a valid message.
pub const INVALID_RESPONSE_SENTINEL: &str = "Error: Invalid API response";

/// Send `prompt` to the Messages API and return the validated message text.
///
/// Fails with [`ApiError::MissingApiKey`] before any network I/O when no key
/// is configured. The request is bounded by `config.timeout`; there is no
/// retry.
pub async fn request_completion(config: &ApiConfig, prompt: &str) -> Result<String, ApiError> {
    let api_key = config.api_key().ok_or(ApiError::MissingApiKey)?;

    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!("hookscribe/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let request = MessagesRequest::user(&config.model, config.max_tokens, prompt);
    debug!(
        "POST {} (model={}, max_tokens={}, prompt={} chars)",
        config.api_url,
        config.model,
        config.max_tokens,
        prompt.len()
    );

    let response = client
        .post(&config.api_url)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&request)
        .send()
        .await
        .map_err(|e| transport_error(e, config.timeout))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(e, config.timeout))?;

    debug!("Messages API answered HTTP {} ({} bytes)", status, body.len());

    if !status.is_success() {
        return Err(status_error(status.as_u16(), &body));
    }

    parse_response(&body)
}

/// Extract and validate the first text block of a response body.
///
/// The body must be a `"type": "message"` object whose first text block is
/// non-empty and is not the legacy sentinel. Error objects are reported by
/// their structured `error` field rather than by searching the text.
pub fn parse_response(body: &str) -> Result<String, ApiError> {
    let response: MessagesResponse = serde_json::from_str(body).map_err(|e| {
        ApiError::InvalidJson(format!("{}. Body: {}", e, truncate(body, 200)))
    })?;

    if let MessagesResponse::Error { error } = response {
        return Err(ApiError::ErrorResponse {
            kind: error.kind,
            message: error.message,
        });
    }

    let text = response.first_text().unwrap_or("").trim();
    if text.is_empty() {
        return Err(ApiError::EmptyResponse);
    }
    if text == INVALID_RESPONSE_SENTINEL {
        return Err(ApiError::ErrorSentinel);
    }

    Ok(text.to_string())
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(timeout)
    } else {
        ApiError::Transport(err)
    }
}

/// Prefer the structured error object when a failed response carries one.
fn status_error(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<MessagesResponse>(body) {
        Ok(MessagesResponse::Error { error }) => ApiError::ErrorResponse {
            kind: error.kind,
            message: error.message,
        },
        _ => ApiError::HttpStatus {
            status,
            body: truncate(body, 200),
        },
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
