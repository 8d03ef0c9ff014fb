//! Shared plumbing for OpenAI-compatible HTTP APIs

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::warn;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub(crate) const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Build a blocking client that sends the bearer token on every request.
///
/// The key falls back to `OPENAI_API_KEY` when not given explicitly.
pub(crate) fn build_client(
    base_url: &str,
    api_key: Option<&str>,
    timeout_secs: u64,
) -> std::result::Result<Client, String> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let api_key = api_key
        .map(str::to_string)
        .or_else(|| std::env::var(API_KEY_ENV).ok());
    match api_key {
        Some(key) => {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| format!("invalid API key format: {e}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        None if base_url.contains("openai.com") => warn!("no API key provided for {base_url}"),
        None => {}
    }

    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(headers)
        .build()
        .map_err(|e| format!("failed to build HTTP client: {e}"))
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Human readable message for a non-success response.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => format!("API returned {status}: {}", parsed.error.message),
        Err(_) if body.trim().is_empty() => format!("API returned {status}"),
        Err(_) => format!("API returned {status}: {}", body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        assert_eq!(
            endpoint("https://api.openai.com/v1/", "embeddings"),
            "https://api.openai.com/v1/embeddings"
        );
        assert_eq!(
            endpoint("http://localhost:1234/v1", "chat/completions"),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_error_message_parses_api_error() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(
            error_message(401, body),
            "API returned 401: Incorrect API key provided"
        );
    }

    #[test]
    fn test_error_message_raw_body() {
        assert_eq!(error_message(502, "Bad Gateway"), "API returned 502: Bad Gateway");
        assert_eq!(error_message(500, "  "), "API returned 500");
    }
}
