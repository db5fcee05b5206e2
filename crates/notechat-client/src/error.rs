//! Error types for the model client.

use thiserror::Error;

/// Errors that can occur when calling the remote model.
///
/// The conversation controller treats every variant the same way; the
/// detail only ends up in the logs.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The prompt was empty after trimming.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The provider answered with a body we could not use.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
