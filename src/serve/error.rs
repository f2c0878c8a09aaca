use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::Error;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Users request/query was malformed: {0}")]
    MalformedRequest(String),

    #[error("lookup error: {0}")]
    Service(#[from] Error),
}

impl ServeError {
    pub fn malformed_request(str: impl ToString) -> Self {
        ServeError::MalformedRequest(str.to_string())
    }
}

/// Errors the notification or query caller is responsible for; everything else is
/// reported as an internal failure without detail.
fn client_fault(error: &Error) -> bool {
    matches!(
        error,
        Error::MalformedScript(_)
            | Error::InvalidQuery
            | Error::InsufficientQueryParameters
            | Error::InvalidTokenData(_)
    )
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let (status, string) = match self {
            ServeError::MalformedRequest(e) => (
                StatusCode::BAD_REQUEST,
                format!("unable to parse request parameters: {e}"),
            ),
            ServeError::Service(ref e) if client_fault(e) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            _ => {
                error!("internal server error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": string
            })),
        )
            .into_response()
    }
}
