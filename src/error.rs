//! Error taxonomy for the rate pipeline.
//!
//! Every error is handled at the boundary where it occurs. On the server it
//! becomes an HTTP response carrying the error text; on the client it ends
//! the run after one log line.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can occur anywhere along client → server → upstream → store.
#[derive(Debug, Error)]
pub enum RateError {
    /// A deadline elapsed, either before dispatch or while in flight.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The outbound request could not be constructed.
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// DNS, connect, timeout or any other failure at the HTTP layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer answered with something other than 200.
    #[error("unexpected status code {code}")]
    UnexpectedStatus { code: u16 },

    /// The response body could not be read to completion.
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// The upstream body was not the expected JSON document.
    #[error("failed to decode exchange rate: {0}")]
    Decode(String),

    /// Opening or migrating the store failed.
    #[error("persistence setup failed: {0}")]
    PersistenceSetup(String),

    /// The insert itself failed or ran past its deadline.
    #[error("persistence write failed: {0}")]
    PersistenceWrite(String),

    /// The local artifact could not be created or written.
    #[error("failed to write artifact: {0}")]
    ArtifactWrite(#[from] std::io::Error),
}

impl RateError {
    /// HTTP status the server answers with when this error ends a request.
    ///
    /// Transport failures map to 400; everything else the server can hit maps
    /// to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RateError::Transport(_) => StatusCode::BAD_REQUEST,
            RateError::UnexpectedStatus { code } => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RateError::DeadlineExceeded => "deadline_exceeded",
            RateError::RequestBuild(_) => "request_build",
            RateError::Transport(_) => "transport",
            RateError::UnexpectedStatus { .. } => "unexpected_status",
            RateError::BodyRead(_) => "body_read",
            RateError::Decode(_) => "decode",
            RateError::PersistenceSetup(_) => "persistence_setup",
            RateError::PersistenceWrite(_) => "persistence_write",
            RateError::ArtifactWrite(_) => "artifact_write",
        }
    }
}

impl IntoResponse for RateError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Result alias for pipeline operations.
pub type RateResult<T> = Result<T, RateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_maps_to_bad_request() {
        let err = RateError::Transport("connection refused".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_fetch_side_errors_map_to_internal_error() {
        for err in [
            RateError::RequestBuild("bad url".into()),
            RateError::BodyRead("eof".into()),
            RateError::Decode("expected value".into()),
            RateError::PersistenceSetup("unable to open database file".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR, "{}", err);
        }
    }

    #[test]
    fn test_unexpected_status_carries_code() {
        let err = RateError::UnexpectedStatus { code: 503 };
        assert_eq!(err.to_string(), "unexpected status code 503");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
