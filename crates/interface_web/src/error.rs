//! Web error handling
//!
//! Every error becomes a short plain-text response. Upstream causes are
//! logged here and never shown to the user.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use domain_pet::PetError;

pub const MISSING_ID: &str = "Error: 'id' is required.";
pub const RECORD_NOT_FOUND: &str = "Pet record not found.";
pub const LIST_FAILED: &str = "Error retrieving pet records";
pub const LOOKUP_FAILED: &str = "Error retrieving pet record.";
pub const SUBMIT_FAILED: &str = "Error processing the pet record.";

/// Web error types
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Bad request: {0}")]
    BadRequest(&'static str),

    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("{message}")]
    Upstream {
        message: &'static str,
        #[source]
        source: PetError,
    },
}

impl WebError {
    /// Maps a domain error, using `upstream_message` if the CRM failed
    pub fn from_pet(err: PetError, upstream_message: &'static str) -> Self {
        match err {
            PetError::MissingExternalId => WebError::BadRequest(MISSING_ID),
            PetError::NotFound(_) => WebError::NotFound(RECORD_NOT_FOUND),
            source @ PetError::Upstream(_) => WebError::Upstream {
                message: upstream_message,
                source,
            },
        }
    }

    /// Returns the HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            WebError::BadRequest(msg) => {
                warn!(status = status.as_u16(), "{msg}");
                msg
            }
            WebError::NotFound(msg) => msg,
            WebError::Upstream { message, source } => {
                error!(status = status.as_u16(), error = %source, "{message}");
                message
            }
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::PortError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            WebError::from_pet(PetError::MissingExternalId, SUBMIT_FAILED).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::from_pet(PetError::not_found("p1"), LOOKUP_FAILED).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::from_pet(PortError::connection("refused").into(), LIST_FAILED).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_keeps_route_message_and_source() {
        let err = WebError::from_pet(PortError::connection("refused").into(), SUBMIT_FAILED);
        assert_eq!(err.to_string(), SUBMIT_FAILED);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_response_is_plain_text() {
        let response = WebError::BadRequest(MISSING_ID).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/plain"));
    }
}
