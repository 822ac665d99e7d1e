//! Request-level probe errors, answered as plain text

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Error: missing address parameter")]
    MissingAddress,

    #[error("Error: invalid address {0:?}")]
    InvalidAddress(String),

    #[error("{probe} failed:\n{raw}")]
    ParseFailure { probe: &'static str, raw: String },

    #[error("Error: file too large ({content_length} bytes), access refused")]
    PayloadTooLarge { content_length: u64 },
}

impl ProbeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProbeError::MissingAddress | ProbeError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            ProbeError::ParseFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProbeError::PayloadTooLarge { .. } => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ProbeError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ProbeError::MissingAddress.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ProbeError::InvalidAddress("-x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ProbeError::PayloadTooLarge { content_length: 6_000_000 }.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ProbeError::ParseFailure { probe: "Ping", raw: String::new() }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_failure_echoes_raw_output() {
        let err = ProbeError::ParseFailure {
            probe: "Ping",
            raw: "ping: unknown host".to_string(),
        };
        assert_eq!(err.to_string(), "Ping failed:\nping: unknown host");
    }

    #[test]
    fn test_response_is_plain_text() {
        let response = ProbeError::MissingAddress.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }
}
