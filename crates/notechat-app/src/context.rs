//! Application context.
//!
//! Built once at startup and passed by reference to whoever needs it.
//! There is no global state: dropping the context (after
//! [`AppContext::shutdown`]) tears everything down.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::controller::ConversationController;
use crate::credentials::{ClientFactory, CredentialStore};
use crate::document::FileDocumentSource;
use crate::error::SettingsError;
use crate::ports::{LanguagePicker, PanelSink};
use crate::settings_store::SettingsStore;

/// Everything the panel needs at runtime.
pub struct AppContext {
    /// Persisted settings.
    pub settings: Arc<SettingsStore>,
    /// API key and model client.
    pub credentials: Arc<CredentialStore>,
    /// The active document.
    pub documents: Arc<FileDocumentSource>,
    /// The conversation controller.
    pub controller: Arc<ConversationController>,
}

impl AppContext {
    /// Load settings, build the model client and wire up the controller.
    pub async fn start(
        settings_path: PathBuf,
        document: Option<PathBuf>,
        factory: Arc<dyn ClientFactory>,
        sink: Arc<dyn PanelSink>,
        picker: Arc<dyn LanguagePicker>,
    ) -> Result<Self, SettingsError> {
        let settings = Arc::new(SettingsStore::load(settings_path).await?);
        let credentials = Arc::new(CredentialStore::new(settings.clone(), factory).await);
        let documents = Arc::new(FileDocumentSource::new(document));

        let controller = Arc::new(ConversationController::new(
            credentials.clone(),
            sink,
            documents.clone(),
            picker,
        ));

        info!(
            settings = %settings.path().display(),
            configured = credentials.has_client().await,
            "Application context started"
        );

        Ok(Self {
            settings,
            credentials,
            documents,
            controller,
        })
    }

    /// Persist settings before the context is dropped.
    pub async fn shutdown(self) -> Result<(), SettingsError> {
        self.controller.close_session().await;
        self.settings.save().await?;
        info!("Application context shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use notechat_client::{ClientError, ModelClient};
    use notechat_core::{ChatRole, Message, Settings};

    use super::*;
    use crate::ports::SuggestionsView;

    struct NullSink;

    #[async_trait]
    impl PanelSink for NullSink {
        async fn set_panel_visible(&self, _visible: bool) {}
        async fn clear_transcript(&self) {}
        async fn render_message(&self, _message: &Message) {}
        async fn set_pending(&self, _pending: bool) {}
        async fn set_suggestions(&self, _view: SuggestionsView) {}
        async fn focus_input(&self, _placeholder: &str) {}
        async fn scroll_to_latest(&self) {}
    }

    struct NoPicker;

    #[async_trait]
    impl LanguagePicker for NoPicker {
        async fn pick_language(&self) -> Option<String> {
            None
        }
    }

    struct Shout;

    #[async_trait]
    impl ModelClient for Shout {
        async fn converse(&self, prompt: &str) -> Result<String, ClientError> {
            Ok(prompt.to_uppercase())
        }
    }

    struct ShoutFactory;

    impl ClientFactory for ShoutFactory {
        fn create(
            &self,
            _api_key: &str,
            _settings: &Settings,
        ) -> Result<Arc<dyn ModelClient>, ClientError> {
            Ok(Arc::new(Shout))
        }
    }

    async fn start(dir: &tempfile::TempDir, document: Option<PathBuf>) -> AppContext {
        AppContext::start(
            dir.path().join("settings.json"),
            document,
            Arc::new(ShoutFactory),
            Arc::new(NullSink),
            Arc::new(NoPicker),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_set_key_then_chat() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = start(&dir, None).await;
        ctx.credentials.set_key("abc123").await.unwrap();

        ctx.controller.open_session().await;
        ctx.controller.submit("hello").await;

        let conversation = ctx.controller.conversation().await;
        assert_eq!(conversation[1].role, ChatRole::Bot);
        assert_eq!(conversation[1].content, "HELLO");
    }

    #[tokio::test]
    async fn test_document_switch_applies_on_next_open() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.md");
        let second = dir.path().join("second.md");
        tokio::fs::write(&first, "first").await.unwrap();
        tokio::fs::write(&second, "second").await.unwrap();

        let ctx = start(&dir, Some(first)).await;
        ctx.controller.open_session().await;
        ctx.documents.set_path(Some(second)).await;
        assert_eq!(ctx.controller.active_context().await.as_deref(), Some("first"));

        ctx.controller.close_session().await;
        ctx.controller.open_session().await;
        assert_eq!(ctx.controller.active_context().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_shutdown_writes_settings() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = start(&dir, None).await;
        ctx.settings.update(|s| s.is_docked = true).await.unwrap();

        ctx.shutdown().await.unwrap();

        let reloaded = SettingsStore::load(dir.path().join("settings.json"))
            .await
            .unwrap();
        assert!(reloaded.get().await.is_docked);
    }
}
