// ── Core error types ──
//
// Operator-facing errors from clientele-core. The `From<clientele_api::Error>`
// impl translates transport-layer failures; server rejections keep the
// response text verbatim so the UI can show it as-is.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// Rejected before any request was made.
    #[error("{message}")]
    Validation { message: String },

    #[error("Malformed identity key: {key}")]
    InvalidIdentityKey { key: String },

    #[error("Client not found: {identifier}")]
    ClientNotFound { identifier: String },

    #[error("Group not found: {identifier}")]
    GroupNotFound { identifier: String },

    // ── Concurrency ──────────────────────────────────────────────────
    #[error("Another change is still in progress")]
    Busy,

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Server errors ────────────────────────────────────────────────
    /// Non-2xx response; `message` is the server's response text.
    #[error("{message}")]
    Api { message: String, status: Option<u16> },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Text shown under an error notice: the server's response text for
    /// API failures, the error message otherwise.
    pub fn detail(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a server rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<clientele_api::Error> for CoreError {
    fn from(err: clientele_api::Error) -> Self {
        match err {
            clientele_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e.url().map(ToString::to_string).unwrap_or_default(),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            clientele_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            clientele_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("URL cannot be used as an API base: {url}"),
            },
            clientele_api::Error::InvalidSessionId => CoreError::Config {
                message: "session id contains characters not allowed in a header".into(),
            },
            clientele_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            clientele_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            clientele_api::Error::Api { status, body } => CoreError::Api {
                message: body,
                status: Some(status),
            },
            clientele_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
