//! Error types for the search facade and their HTTP mapping.

use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;

use crate::redact::sanitize_message;

/// Failures talking to the search engine.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("search engine unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search engine returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("search engine returned malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("unexpected search engine response: {0}")]
    UnexpectedShape(String),

    #[error("invalid search engine url: {0}")]
    InvalidUrl(String),

    /// The outgoing request could not be encoded; nothing was sent.
    #[error("failed to encode search engine request: {0}")]
    RequestEncoding(String),
}

#[derive(Error, Debug)]
pub enum SearchError {
    /// Malformed client input.
    #[error("{0}")]
    Validation(String),

    /// Nothing left to search for after trimming.
    #[error("no valid {0} provided")]
    EmptyCriteria(&'static str),

    #[error("unsupported stats type: {0}")]
    UnsupportedStatType(String),

    #[error("search engine request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::Validation(_) | SearchError::EmptyCriteria(_) | SearchError::UnsupportedStatType(_) => {
                StatusCode::BAD_REQUEST
            }
            SearchError::Transport(_) | SearchError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller. Server-side failures never echo engine detail.
    pub fn public_message(&self) -> String {
        match self {
            SearchError::Transport(_) => "search engine request failed".to_string(),
            SearchError::Export(_) => "export failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", sanitize_message(&format!("{:#?}", self)));
        } else {
            tracing::warn!("request rejected: {}", sanitize_message(&self.to_string()));
        }
        let body = serde_json::json!({ "detail": self.public_message() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(SearchError::Validation("bad range".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(SearchError::EmptyCriteria("patent IDs").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(SearchError::UnsupportedStatType("inventor".into()).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn transport_errors_are_sanitized() {
        let err = SearchError::from(TransportError::Status {
            status: 500,
            body: "java.lang.NullPointerException at org.apache.solr...".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "search engine request failed");
        assert!(err.to_string().contains("NullPointerException"));
    }

    #[test]
    fn request_encoding_is_not_blamed_on_the_engine() {
        let err = SearchError::from(TransportError::RequestEncoding("json.facet: key must be a string".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("failed to encode search engine request"));
        assert!(!err.to_string().contains("returned"));
    }

    #[test]
    fn empty_criteria_display() {
        assert_eq!(SearchError::EmptyCriteria("patent IDs").to_string(), "no valid patent IDs provided");
    }

    #[test]
    fn unsupported_stat_type_display() {
        let err = SearchError::UnsupportedStatType("inventor".to_string());
        assert_eq!(err.to_string(), "unsupported stats type: inventor");
        assert_eq!(err.public_message(), "unsupported stats type: inventor");
    }
}
