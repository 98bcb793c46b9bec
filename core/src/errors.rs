use thiserror::Error;

/// Booking API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    /// The API answered 401; the stored token has been dropped and the
    /// caller must sign in again before retrying.
    #[error("Session Invalidated: the API rejected the stored token")]
    Unauthorized,

    /// Login or registration was refused by the server.
    #[error("Credentials Rejected: {message}")]
    Rejected { message: String },

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Result type for booking API operations
pub type ApiResult<T> = Result<T, ApiError>;
