//! Generation error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when asking the service for a website.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Service answered with a non-success status
    #[error("generation service returned status {status}")]
    Rejected { status: u16 },

    /// No response within the client timeout
    #[error("generation request timed out after {after:?}")]
    Timeout { after: Duration },

    /// HTTP request failed
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body lacked an HTML document
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}
