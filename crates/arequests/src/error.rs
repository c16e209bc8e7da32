//! Error types for sessions and responses

use thiserror::Error;

/// Errors surfaced by arequests
///
/// Transport failures are carried as the original `reqwest::Error`, decode and
/// JSON failures come from reading an already-buffered body.
#[derive(Error, Debug)]
pub enum Error {
    /// Anything the transport reported (DNS, TCP, TLS, timeout, bad URL, malformed response)
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body bytes are not valid under the declared encoding
    #[error("Failed to decode response body as {encoding}")]
    Decode {
        /// Name of the encoding used for decoding
        encoding: &'static str,
    },

    /// Body text is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Method string is not a valid HTTP token
    #[error("Invalid method: {0}")]
    InvalidMethod(#[from] http::method::InvalidMethod),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}

/// Result type for arequests operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error category for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection-related errors (DNS, TCP, TLS)
    Connection,
    /// Timeout errors
    Timeout,
    /// Invalid request construction
    Request,
    /// Body could not be decoded as text
    Decode,
    /// Body text is not valid JSON
    Json,
    /// Unknown/other errors
    Other,
}

impl Error {
    /// Categorize the error for reporting
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Transport(e) => {
                if e.is_connect() {
                    ErrorCategory::Connection
                } else if e.is_timeout() {
                    ErrorCategory::Timeout
                } else if e.is_builder() || e.is_request() {
                    ErrorCategory::Request
                } else {
                    ErrorCategory::Other
                }
            }
            Error::Decode { .. } => ErrorCategory::Decode,
            Error::Json(_) => ErrorCategory::Json,
            Error::InvalidMethod(_)
            | Error::InvalidHeaderName(_)
            | Error::InvalidHeaderValue(_) => ErrorCategory::Request,
        }
    }

    /// Error message with credentials and tokens redacted
    pub fn sanitized_message(&self) -> String {
        sanitize(&self.to_string())
    }
}

/// Redact URL credentials and bearer tokens from a message before it is logged
pub(crate) fn sanitize(msg: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static URL_CREDS_RE: OnceLock<Regex> = OnceLock::new();
    static AUTH_RE: OnceLock<Regex> = OnceLock::new();

    let url_creds_re = URL_CREDS_RE
        .get_or_init(|| Regex::new(r"(https?://)[^@/\s:]+:[^@/\s]+@").expect("valid regex"));
    let auth_re = AUTH_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(bearer|api[_-]?key|(?:access_|refresh_)?token)(?:\s*[:=]\s*|\s+)[^\s&]+")
            .expect("valid regex")
    });

    let sanitized = url_creds_re.replace_all(msg, "${1}[REDACTED]@");
    let sanitized = auth_re.replace_all(&sanitized, "$1: [REDACTED]");

    sanitized.into_owned()
}
