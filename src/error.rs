//! Error types for driveboard.

use thiserror::Error;

/// Common error type for driveboard.
#[derive(Error, Debug)]
pub enum DriveboardError {
    /// Database error.
    ///
    /// Wraps statement failures from any backend. Errors from sqlx are
    /// converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for request fields.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// More than one entry matched where exactly one was required.
    #[error("ambiguous {0}")]
    Ambiguous(String),

    /// Supplied password does not match the stored credential.
    #[error("password mismatch")]
    AuthMismatch,

    /// Method label the dispatcher does not handle.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Stored credential could not be decoded.
    #[error("credential error: {0}")]
    Credential(#[from] crate::auth::PasswordError),

    /// Internal failure (e.g. a blocking task panicked).
    #[error("internal error: {0}")]
    Internal(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DriveboardError {
    /// HTTP status code reported for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DriveboardError::Validation(_) => 422,
            DriveboardError::NotFound(_) => 404,
            DriveboardError::Ambiguous(_) => 409,
            DriveboardError::AuthMismatch => 403,
            DriveboardError::UnknownMethod(_) => 400,
            _ => 500,
        }
    }

    /// Message safe to return to a caller.
    ///
    /// Internal failures collapse to a generic message so storage details and
    /// credential material never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            DriveboardError::Validation(_)
            | DriveboardError::NotFound(_)
            | DriveboardError::AuthMismatch => self.to_string(),
            DriveboardError::Ambiguous(_) => "multiple entries share this updated_id".to_string(),
            DriveboardError::UnknownMethod(_) => "unknown error".to_string(),
            _ => "internal error".to_string(),
        }
    }

    /// Whether this error is a server-side fault rather than a caller mistake.
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for DriveboardError {
    fn from(e: sqlx::Error) -> Self {
        DriveboardError::Database(e.to_string())
    }
}

/// Result type alias for driveboard operations.
pub type Result<T> = std::result::Result<T, DriveboardError>;
