//! File-backed settings persistence.

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, info};

use notechat_core::Settings;

use crate::error::SettingsError;

const SETTINGS_FILE: &str = "settings.json";

/// Holds the live settings record and writes it back to disk.
pub struct SettingsStore {
    path: PathBuf,
    settings: RwLock<Settings>,
}

impl SettingsStore {
    /// Default location: `<config_dir>/notechat/settings.json`.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join("notechat").join(SETTINGS_FILE))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load settings from `path`, merging defaults over whatever is stored.
    ///
    /// A missing file yields the defaults; it is created on the first save.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                Settings::default()
            }
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), docked = settings.is_docked, "Settings loaded");
        Ok(Self {
            path,
            settings: RwLock::new(settings),
        })
    }

    /// Store that is never read from disk; saving still writes to `path`.
    pub fn with_settings(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            path: path.into(),
            settings: RwLock::new(settings),
        }
    }

    /// Location of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Apply `change` and persist the result.
    pub async fn update<F>(&self, change: F) -> Result<Settings, SettingsError>
    where
        F: FnOnce(&mut Settings),
    {
        let snapshot = {
            let mut settings = self.settings.write().await;
            change(&mut settings);
            settings.clone()
        };
        self.write(&snapshot).await?;
        Ok(snapshot)
    }

    /// Persist the current settings.
    pub async fn save(&self) -> Result<(), SettingsError> {
        let snapshot = self.get().await;
        self.write(&snapshot).await
    }

    async fn write(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write to a sibling file first so a crash never leaves a truncated record.
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use notechat_core::FloatingPosition;

    use super::*;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json"))
            .await
            .unwrap();
        assert_eq!(store.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_stored_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, r#"{"apiKey":"MzIxY2Jh","floatingPosition":{"x":3,"y":4}}"#)
            .await
            .unwrap();

        let settings = SettingsStore::load(&path).await.unwrap().get().await;
        assert_eq!(settings.api_key, "MzIxY2Jh");
        assert_eq!(settings.floating_position, FloatingPosition { x: 3, y: 4 });
        assert!(!settings.is_docked);
    }

    #[tokio::test]
    async fn test_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::load(&path).await.unwrap();

        store.update(|s| s.is_docked = true).await.unwrap();

        let reloaded = SettingsStore::load(&path).await.unwrap().get().await;
        assert!(reloaded.is_docked);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        assert!(matches!(
            SettingsStore::load(&path).await,
            Err(SettingsError::Json(_))
        ));
    }
}
