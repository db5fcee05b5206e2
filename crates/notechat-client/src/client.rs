//! The model client seam.

use async_trait::async_trait;

use notechat_core::prompt;

use crate::error::ClientError;

/// A stateless client for a generative text model.
///
/// Implementations carry no mutable state, so one instance can serve
/// overlapping calls.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `prompt` and return the generated text, unparsed.
    async fn converse(&self, prompt: &str) -> Result<String, ClientError>;

    /// Translate `content` into `target_language`.
    ///
    /// Goes through the same remote call path as [`ModelClient::converse`].
    async fn translate(&self, content: &str, target_language: &str) -> Result<String, ClientError> {
        self.converse(&prompt::translate(content, target_language))
            .await
    }
}
