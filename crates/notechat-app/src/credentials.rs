//! API key storage and model client creation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use notechat_client::{ClientError, GeminiClient, ModelClient};
use notechat_core::{obfuscate, reveal, Settings};

use crate::error::SettingsError;
use crate::settings_store::SettingsStore;

/// Builds a model client for a plain API key.
pub trait ClientFactory: Send + Sync {
    fn create(&self, api_key: &str, settings: &Settings)
        -> Result<Arc<dyn ModelClient>, ClientError>;
}

/// Factory producing [`GeminiClient`]s.
#[derive(Debug, Clone, Default)]
pub struct GeminiFactory {
    base_url: Option<String>,
}

impl GeminiFactory {
    /// Factory for a non-default endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }
}

impl ClientFactory for GeminiFactory {
    fn create(
        &self,
        api_key: &str,
        settings: &Settings,
    ) -> Result<Arc<dyn ModelClient>, ClientError> {
        let timeout = (settings.request_timeout_secs > 0)
            .then(|| Duration::from_secs(settings.request_timeout_secs));
        let mut client = GeminiClient::new(api_key, settings.model.as_str(), timeout)?;
        if let Some(base_url) = &self.base_url {
            client = client.with_base_url(base_url);
        }
        Ok(Arc::new(client))
    }
}

/// Where the controller gets its model client from.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// The current client, or `None` if no key is configured.
    async fn client(&self) -> Option<Arc<dyn ModelClient>>;
}

/// Holds the configured key and the client created from it.
///
/// The key is persisted through [`obfuscate`], which keeps it out of the
/// settings file as plain text but is not encryption.
pub struct CredentialStore {
    settings: Arc<SettingsStore>,
    factory: Arc<dyn ClientFactory>,
    client: RwLock<Option<Arc<dyn ModelClient>>>,
}

impl CredentialStore {
    /// Create the store and build a client from the stored key, if any.
    pub async fn new(settings: Arc<SettingsStore>, factory: Arc<dyn ClientFactory>) -> Self {
        let store = Self {
            settings,
            factory,
            client: RwLock::new(None),
        };
        store.refresh().await;
        store
    }

    /// Persist a new key and re-create the model client.
    ///
    /// An empty key clears the configuration.
    pub async fn set_key(&self, plain: &str) -> Result<(), SettingsError> {
        let stored = obfuscate(plain.trim());
        self.settings.update(|s| s.api_key = stored).await?;
        self.refresh().await;
        info!(configured = self.has_client().await, "API key updated");
        Ok(())
    }

    /// The last created client, or `None` if no key is configured.
    pub async fn get_client(&self) -> Option<Arc<dyn ModelClient>> {
        self.client.read().await.clone()
    }

    /// Returns true if a client is available.
    pub async fn has_client(&self) -> bool {
        self.client.read().await.is_some()
    }

    /// Rebuild the client from the current settings.
    pub async fn refresh(&self) {
        let settings = self.settings.get().await;
        let client = self.build(&settings);
        *self.client.write().await = client;
    }

    fn build(&self, settings: &Settings) -> Option<Arc<dyn ModelClient>> {
        if !settings.has_api_key() {
            return None;
        }

        let plain = match reveal(&settings.api_key) {
            Ok(plain) => plain,
            Err(e) => {
                warn!(error = %e, "Stored API key could not be decoded");
                return None;
            }
        };

        match self.factory.create(&plain, settings) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "Failed to create model client");
                None
            }
        }
    }
}

#[async_trait]
impl ClientProvider for CredentialStore {
    async fn client(&self) -> Option<Arc<dyn ModelClient>> {
        self.get_client().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct EchoClient;

    #[async_trait]
    impl ModelClient for EchoClient {
        async fn converse(&self, prompt: &str) -> Result<String, ClientError> {
            Ok(prompt.to_string())
        }
    }

    #[derive(Default)]
    struct RecordingFactory {
        keys: Mutex<Vec<String>>,
    }

    impl ClientFactory for RecordingFactory {
        fn create(
            &self,
            api_key: &str,
            _settings: &Settings,
        ) -> Result<Arc<dyn ModelClient>, ClientError> {
            self.keys.lock().unwrap().push(api_key.to_string());
            Ok(Arc::new(EchoClient))
        }
    }

    fn store_in(dir: &tempfile::TempDir, settings: Settings) -> Arc<SettingsStore> {
        Arc::new(SettingsStore::with_settings(
            dir.path().join("settings.json"),
            settings,
        ))
    }

    #[tokio::test]
    async fn test_no_key_means_no_client() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(RecordingFactory::default());
        let store = CredentialStore::new(store_in(&dir, Settings::default()), factory.clone()).await;

        assert!(store.get_client().await.is_none());
        assert!(factory.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_key_persists_obfuscated_and_builds_client() {
        let dir = tempfile::tempdir().unwrap();
        let settings = store_in(&dir, Settings::default());
        let factory = Arc::new(RecordingFactory::default());
        let store = CredentialStore::new(settings.clone(), factory.clone()).await;

        store.set_key("abc123").await.unwrap();

        let stored = settings.get().await.api_key;
        assert_ne!(stored, "abc123");
        assert_eq!(reveal(&stored).unwrap(), "abc123");
        assert!(store.get_client().await.is_some());
        assert_eq!(*factory.keys.lock().unwrap(), vec!["abc123".to_string()]);

        let on_disk = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(!on_disk.contains("abc123"));
    }

    #[tokio::test]
    async fn test_stored_key_is_revealed_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            api_key: obfuscate("from-disk"),
            ..Settings::default()
        };
        let factory = Arc::new(RecordingFactory::default());
        let store = CredentialStore::new(store_in(&dir, settings), factory.clone()).await;

        assert!(store.has_client().await);
        assert_eq!(*factory.keys.lock().unwrap(), vec!["from-disk".to_string()]);
    }

    #[tokio::test]
    async fn test_clearing_key_drops_client() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            api_key: obfuscate("old"),
            ..Settings::default()
        };
        let store =
            CredentialStore::new(store_in(&dir, settings), Arc::new(RecordingFactory::default()))
                .await;

        store.set_key("").await.unwrap();
        assert!(store.get_client().await.is_none());
    }

    #[tokio::test]
    async fn test_undecodable_key_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            api_key: "%%%".to_string(),
            ..Settings::default()
        };
        let store =
            CredentialStore::new(store_in(&dir, settings), Arc::new(RecordingFactory::default()))
                .await;
        assert!(store.get_client().await.is_none());
    }

    #[tokio::test]
    async fn test_gemini_factory_uses_base_url_override() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let factory = GeminiFactory::with_base_url(format!("http://{addr}"));
        let client = factory.create("key", &Settings::default()).unwrap();
        let err = client.converse("Hello").await.unwrap_err();

        assert!(matches!(err, ClientError::Http(_)));
        assert!(err.to_string().contains(&addr.to_string()));
    }
}
