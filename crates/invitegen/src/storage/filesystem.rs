use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use super::{check_key, ObjectStore};
use crate::error::GenerationError;

/// Stores objects as files under a root directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written object and re-uploads overwrite.
pub struct FilesystemStore {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl FilesystemStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            public_base_url: None,
        }
    }

    /// Serve stored objects at `{base}/{key}` instead of `file://` URLs.
    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

fn upload_failed(key: &str, context: &str, e: std::io::Error) -> GenerationError {
    GenerationError::UploadFailed {
        key: key.to_string(),
        reason: format!("{}: {}", context, e),
    }
}

#[async_trait]
impl ObjectStore for FilesystemStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        _cache_control: &str,
    ) -> Result<String, GenerationError> {
        check_key(key)?;

        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| upload_failed(key, "Failed to create directory", e))?;
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("object");
        let temp = path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|e| upload_failed(key, "Failed to write file", e))?;

        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(upload_failed(key, "Failed to move file into place", e));
        }

        debug!(
            "Stored {} ({} bytes, {}) at {}",
            key,
            bytes.len(),
            content_type,
            path.display()
        );
        Ok(self.public_url(key))
    }

    fn public_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base, key),
            None => format!("file://{}", self.path_for(key).display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_writes_file() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path());

        let url = store
            .put("templates/wedding/ceremony/x_full.png", b"png".to_vec(), "image/png", "")
            .await
            .unwrap();

        let path = dir.path().join("templates/wedding/ceremony/x_full.png");
        assert_eq!(std::fs::read(&path).unwrap(), b"png");
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("templates/wedding/ceremony/x_full.png"));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path());

        store.put("a/b.png", b"one".to_vec(), "image/png", "").await.unwrap();
        store.put("a/b.png", b"two".to_vec(), "image/png", "").await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("a/b.png")).unwrap(), b"two");
        // No temp files left behind.
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("a")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_escaping_key() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path());
        let err = store
            .put("../outside.png", vec![1], "image/png", "")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::UploadFailed { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_public_base_url() {
        let store =
            FilesystemStore::new("/srv/assets").with_public_base_url("http://localhost:8080/");
        assert_eq!(
            store.public_url("templates/a/b.png"),
            "http://localhost:8080/templates/a/b.png"
        );
    }
}
