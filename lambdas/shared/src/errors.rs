//! Error types for SurveyPipeline

use thiserror::Error;

/// Result type alias using SurveyPipeline Error
pub type Result<T> = std::result::Result<T, Error>;

/// SurveyPipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// N or M absent from the generator request
    #[error("Please provide M and N values.")]
    MissingInput,

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport endpoint answered with a non-200 status
    #[error("Transport returned HTTP {status}: {details}")]
    TransportStatus { status: u16, details: String },

    /// Transport-level failure (DNS, connection, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Conditional update found no row for the key
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// DynamoDB error
    #[error("Database error: {0}")]
    Database(String),

    /// JSON Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// DynamoDB serialization error
    #[error("DynamoDB serialization error: {0}")]
    DynamoSerialization(String),

    /// Missing or malformed environment configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code used in logs and response bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingInput => "missing_input",
            Error::Validation(_) => "validation_error",
            Error::TransportStatus { .. } => "transport_status",
            Error::Http(_) => "http_error",
            Error::UserNotFound(_) => "user_not_found",
            Error::Database(_) => "database_error",
            Error::Serialization(_) => "serialization_error",
            Error::DynamoSerialization(_) => "serialization_error",
            Error::Config(_) => "config_error",
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingInput => 400,
            Error::Validation(_) => 400,
            Error::TransportStatus { status, .. } => *status,
            Error::Http(_) => 500,
            Error::UserNotFound(_) => 404,
            Error::Database(_) => 500,
            Error::Serialization(_) => 500,
            Error::DynamoSerialization(_) => 500,
            Error::Config(_) => 500,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}
