// src/errors.rs
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Remote function failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Unexpected response structure: {0}")]
    UnexpectedResponse(String),

    /// The call completed but the remote function reported errors.
    #[error("Remote function returned {} error(s): {}", errors.len(), errors.join("; "))]
    RemoteErrorsReturned { errors: Vec<String> },

    /// The call itself failed: transport, auth or a malformed response.
    #[error("Remote call failed: {0}")]
    CallThrew(String),

    #[error("A submission is already in flight for this view")]
    SubmissionInFlight,

    #[error("View '{0}' not found")]
    ViewNotFound(Uuid),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
