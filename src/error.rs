//! Error types for gatekeep

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'gatekeep init' first.")]
    ConfigNotFound,

    #[error("No token signing secret configured")]
    MissingSecret,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("{0}")]
    Validation(String),

    #[error("Username '{0}' already exists")]
    UsernameTaken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl Error {
    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::UsernameTaken(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::MissingToken | Error::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error was caused by the client rather than by the server
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::UsernameTaken("bob".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::InvalidToken("bad".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::NotFound("User".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::MissingSecret.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_errors_are_not_client_errors() {
        assert!(!Error::Config("bad".into()).is_client_error());
        assert!(!Error::Other("boom".into()).is_client_error());
        assert!(Error::MissingToken.is_client_error());
    }
}
