//! Core domain errors.

use thiserror::Error;

/// Failure kinds of the conversation lifecycle.
///
/// None of these escape the controller: each one is turned into an
/// inline `error` message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// No API key / model client configured.
    #[error("{0}")]
    Configuration(String),

    /// The operation cannot run in the current state.
    #[error("{0}")]
    Precondition(String),
}
