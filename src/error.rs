//! Error types for inventory_client

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for every client operation.
///
/// All variants are terminal for the action that raised them; nothing in the
/// crate retries on its own.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Login or registration rejected by the server (bad credentials, taken email)
    #[error("{0}")]
    AuthFailure(String),
    /// An authenticated call came back 401; the session has been cleared
    #[error("Session expired. Please login again.")]
    SessionExpired,
    /// No bearer token is held, so nothing was sent
    #[error("Please login first")]
    NotSignedIn,
    /// The server rejected a stock update because the submitted version is stale
    #[error("Version conflict on product #{id}")]
    VersionConflict { id: i64 },
    /// Local input was rejected before any request was made
    #[error("{0}")]
    Validation(String),
    /// Any other non-2xx response, carrying the server-provided message
    #[error("{message}")]
    Server { status: StatusCode, message: String },
    /// HTTP request failed (connection refused, TLS, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse a JSON response body
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A third-party sample-data API failed or returned nothing usable
    #[error("{0}")]
    ExternalSource(String),
    /// File I/O error (session file, CSV output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ClientError {
    /// True when the error means the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::SessionExpired | ClientError::NotSignedIn)
    }
}

/// Result alias for inventory_client operations
pub type Result<T> = std::result::Result<T, ClientError>;
