//! Error types for the sportintake-core library.

use thiserror::Error;

/// Main error type for the sportintake library.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// Document parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors surfaced to callers of `parse`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input is too short to be a real document. No parsing was attempted.
    #[error("input too short to be a document ({length} characters, minimum {minimum})")]
    ShortInput { length: usize, minimum: usize },

    /// Required fields could not be recovered by either extraction path.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),
}

/// Failures of the remote AI extractor.
///
/// These never reach callers of the orchestrator; they only decide that the
/// heuristic path takes over.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Remote extraction is switched off in the configuration.
    #[error("remote extractor disabled")]
    Disabled,

    /// The API key environment variable is absent or empty.
    #[error("missing credential: {0} is not set")]
    MissingCredential(String),

    /// The remote call did not finish in time.
    #[error("remote extractor timed out after {0}s")]
    Timeout(u64),

    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success HTTP status.
    #[error("remote extractor returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The reply could not be interpreted as a record.
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            UpstreamError::MalformedReply(e.to_string())
        } else {
            UpstreamError::Http(e.to_string())
        }
    }
}

/// Result type for the sportintake library.
pub type Result<T> = std::result::Result<T, IntakeError>;
