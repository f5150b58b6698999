//! Feed providers and the helpers they share.

pub mod twitter;

use std::fmt;

use anyhow::{Context, Result};
use serde_json::Value;

pub use twitter::TwitterClient;

/// Standard User-Agent header for feedline API requests.
pub const USER_AGENT: &str = concat!("feedline/", env!("CARGO_PKG_VERSION"));

/// Resolves a base URL with precedence: env > config > default.
///
/// # Errors
/// Returns an error if the chosen URL does not parse.
pub fn resolve_base_url(
    config_base_url: Option<&str>,
    env_var: &str,
    default_url: &str,
    label: &str,
) -> Result<String> {
    if let Ok(env_url) = std::env::var(env_var) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed, label)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed, label)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(default_url.to_string())
}

fn validate_url(url: &str, label: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid {label} URL: {url}"))?;
    Ok(())
}

/// Error categories surfaced by providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Credentials rejected (401/403).
    Auth,
    /// Too many requests (420/429).
    RateLimited,
    /// Any other non-success status.
    HttpStatus,
    /// Request timed out.
    Timeout,
    /// Connection or body read failure.
    Transport,
    /// Response body could not be decoded.
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Auth => write!(f, "auth"),
            ApiErrorKind::RateLimited => write!(f, "rate_limited"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured provider error with kind and one-line summary.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// Raw response body, when there was one.
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an error from a non-success status and its body.
    ///
    /// Uses the first `errors[].message` from the body when present.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ApiErrorKind::Auth,
            420 | 429 => ApiErrorKind::RateLimited,
            _ => ApiErrorKind::HttpStatus,
        };

        let api_message = serde_json::from_str::<Value>(body).ok().and_then(|json| {
            json.get("errors")?
                .get(0)?
                .get("message")?
                .as_str()
                .map(ToString::to_string)
        });
        let message = match api_message {
            Some(msg) => format!("HTTP {status}: {msg}"),
            None => format!("HTTP {status}"),
        };

        Self {
            kind,
            message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ApiErrorKind::Timeout
        } else {
            ApiErrorKind::Transport
        };
        Self::new(kind, format!("Request failed: {err}"))
    }
}
