//! Failures talking to the archive API

use std::time::Duration;

use serde::Deserialize;

/// A failed request, split by where it failed.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        /// Message from the body, or a reason phrase.
        message: String,
        /// Machine-readable error code, if the body carried one.
        code: Option<String>,
    },

    /// The request never got an answer.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The per-request timeout elapsed.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The configured base URL is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A 2xx body that is not the expected JSON.
    #[error("Response parse error: {message}")]
    Parse {
        message: String,
        /// The body as received.
        body: Option<String>,
    },
}

/// Error body returned by the archive API, e.g.
/// `{"message": "Forbidden", "code": "tenant_mismatch"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: Option<String>,
    code: Option<String>,
}

impl ApiError {
    /// Status error without a code.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            code: None,
        }
    }

    /// Builds an HTTP error from a failed response body.
    ///
    /// JSON bodies with a `message` (or `error`) field contribute their message
    /// and code; anything else is used verbatim.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                message: Some(message),
                code,
            }) => Self::Http {
                status,
                message,
                code,
            },
            _ if body.trim().is_empty() => Self::http(status, default_reason(status)),
            _ => Self::http(status, body.trim()),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Parse error keeping the offending body for logs.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Status of an [`ApiError::Http`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's machine-readable code, if it sent one.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether sending the same request again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

fn default_reason(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not found",
        409 => "Conflict",
        422 => "Unprocessable entity",
        429 => "Too many requests",
        500..=599 => "Server error",
        _ => "Request failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_body() {
        let err = ApiError::from_body(403, r#"{"message":"Not your tenant","code":"tenant_mismatch"}"#);
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(err.error_code(), Some("tenant_mismatch"));
        assert_eq!(err.to_string(), "HTTP 403: Not your tenant");
    }

    #[test]
    fn test_from_error_alias() {
        let err = ApiError::from_body(500, r#"{"error":"boom"}"#);
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_from_plain_and_empty_body() {
        assert_eq!(ApiError::from_body(502, " bad gateway \n").to_string(), "HTTP 502: bad gateway");
        assert_eq!(ApiError::from_body(404, "").to_string(), "HTTP 404: Not found");
        assert!(!ApiError::from_body(404, "").is_retryable());
    }
}
