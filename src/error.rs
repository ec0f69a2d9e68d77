use thiserror::Error;

use crate::models::validation::ValidationErrors;

/// Application-wide error types.
///
/// Every failure a content operation can surface maps to exactly one of
/// these kinds, and each kind maps to one HTTP status (see `api::errors`).
#[derive(Debug, Error)]
pub enum AppError {
    /// A required request parameter (the id or the body) was absent.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// One or more fields violate the content rules.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The database could not be reached (bad URI, failed handshake, lost server).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database was reachable but rejected the operation.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Classify a driver error: anything that means "the server is not there"
/// is a connection error, the rest is an operation failure.
#[cfg(feature = "server")]
impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => AppError::Connection(err.to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}
