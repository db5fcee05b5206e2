//! Active document backed by a file on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::ports::DocumentSource;

/// The note currently "open" in the host.
///
/// The path can be switched at any time; the controller only reads it
/// when a session opens.
#[derive(Default)]
pub struct FileDocumentSource {
    path: RwLock<Option<PathBuf>>,
}

impl FileDocumentSource {
    /// Source with `path` as the active document.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: RwLock::new(path),
        }
    }

    /// Switch the active document; `None` closes it.
    pub async fn set_path(&self, path: Option<PathBuf>) {
        debug!(path = ?path, "Active document changed");
        *self.path.write().await = path;
    }

    /// Path of the active document.
    pub async fn path(&self) -> Option<PathBuf> {
        self.path.read().await.clone()
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn active_document_text(&self) -> Option<String> {
        let path = self.path().await?;
        read_document(&path).await
    }
}

async fn read_document(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            debug!(path = %path.display(), chars = text.chars().count(), "Read active document");
            Some(text)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read active document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_active_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        tokio::fs::write(&path, "# Meeting\n- ship it").await.unwrap();

        let source = FileDocumentSource::new(Some(path));
        assert_eq!(
            source.active_document_text().await.as_deref(),
            Some("# Meeting\n- ship it")
        );
    }

    #[tokio::test]
    async fn test_no_active_file() {
        let source = FileDocumentSource::default();
        assert!(source.active_document_text().await.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_file_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileDocumentSource::new(Some(dir.path().join("gone.md")));
        assert!(source.active_document_text().await.is_none());
    }

    #[tokio::test]
    async fn test_switching_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.md");
        tokio::fs::write(&path, "B").await.unwrap();

        let source = FileDocumentSource::default();
        source.set_path(Some(path)).await;
        assert_eq!(source.active_document_text().await.as_deref(), Some("B"));
    }
}
