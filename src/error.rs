use axum::http::StatusCode;
use thiserror::Error;

use crate::models::ErrorBody;

/// ApiError
///
/// The failure taxonomy shared by every route handler. Each variant maps to exactly
/// one status code and a JSON `{ "error": ... }` body, so a failing handler still
/// terminates with a well-formed response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The route exists but does not accept the request method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The route is mounted but its feature has not been built yet.
    #[error("{0} is not implemented")]
    NotImplemented(String),

    /// The capability behind the route was switched off on purpose.
    #[error("{0} is disabled")]
    Disabled(String),

    /// An external collaborator (auth provider, database) failed. The message is
    /// logged server-side and never returned to the caller.
    #[error("collaborator failure: {0}")]
    Collaborator(String),

    /// The request body could not be decoded.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotImplemented(_) | ApiError::Disabled(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Collaborator(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The client-facing body. Collaborator failures collapse to a generic message.
    pub fn body(&self) -> ErrorBody {
        let error = match self {
            ApiError::Collaborator(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorBody { error }
    }
}
