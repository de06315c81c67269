//! Error types for the customer service client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the customer service.
///
/// Every transport or status failure is normalized into one of these variants,
/// so callers never need to inspect `reqwest` errors directly.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server answered with a status other than 2xx or 302.
    #[error("server responded with {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Best-effort decoded response body.
        message: String,
    },

    /// No response was received (connection failure or timeout).
    #[error("no response from server: {0}")]
    NoResponse(String),

    /// A successful response carried a body that is not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    Request(String),
}

impl ApiError {
    /// Build a `Server` error from a status and the raw response body.
    ///
    /// JSON bodies are re-rendered compactly, other bodies are used as text,
    /// and an empty body falls back to the status' canonical reason.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        Self::Server {
            status: status.as_u16(),
            message: decode_message(status, body),
        }
    }

    /// HTTP status, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before any response arrived.
    #[must_use]
    pub const fn is_no_response(&self) -> bool {
        matches!(self, Self::NoResponse(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Self::Request(e.to_string())
        } else if e.is_timeout() {
            Self::NoResponse(e.to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::NoResponse(e.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        Self::Request(e.to_string())
    }
}

fn decode_message(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();

    if text.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }

    serde_json::from_str::<serde_json::Value>(text)
        .map_or_else(|_| text.to_string(), |value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = ApiError::Server {
            status: 404,
            message: "customer not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "server responded with 404: customer not found"
        );
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_from_response_compacts_json_body() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            br#"{ "erro" : "nome obrigatorio" }"#,
        );
        let ApiError::Server { status, message } = err else {
            panic!("expected server error");
        };
        assert_eq!(status, 400);
        assert_eq!(message, r#"{"erro":"nome obrigatorio"}"#);
    }

    #[test]
    fn test_from_response_keeps_plain_text() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, b"boom\n");
        assert!(matches!(err, ApiError::Server { ref message, .. } if message == "boom"));
    }

    #[test]
    fn test_from_response_empty_body_uses_reason() {
        let err = ApiError::from_response(StatusCode::SERVICE_UNAVAILABLE, b"");
        assert_eq!(err.status(), Some(503));
        assert_eq!(
            err.to_string(),
            "server responded with 503: Service Unavailable"
        );
    }

    #[test]
    fn test_no_response_has_no_status() {
        let err = ApiError::NoResponse("connection refused".to_string());
        assert!(err.is_no_response());
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "no response from server: connection refused"
        );
    }
}
