use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::domain::{
    error::StorageError,
    models::image::DecodedImage,
    services::blob_store::{BlobStore, generate_object_name},
};

/// Stores media on the local filesystem.
///
/// Files land in `<root>/<url_prefix>/<directory>/<name>` and the returned
/// reference is the root-relative path `/<url_prefix>/<directory>/<name>`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_matches('/').to_string(),
        }
    }

    fn relative_dir(&self, directory: &str) -> String {
        let directory = directory.trim_matches('/');
        if self.url_prefix.is_empty() {
            directory.to_string()
        } else {
            format!("{}/{}", self.url_prefix, directory)
        }
    }

    /// Map a reference back onto the filesystem, refusing anything outside the root
    fn resolve(&self, reference: &str) -> Result<PathBuf, StorageError> {
        let relative = reference
            .strip_prefix('/')
            .ok_or_else(|| StorageError::InvalidReference(reference.to_string()))?;
        let relative = Path::new(relative);
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if relative.as_os_str().is_empty() || !contained {
            return Err(StorageError::InvalidReference(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, image: &DecodedImage, directory: &str) -> Result<String, StorageError> {
        let relative_dir = self.relative_dir(directory);
        let target_dir = self.root.join(&relative_dir);
        tokio::fs::create_dir_all(&target_dir).await?;

        let name = generate_object_name(image.extension());
        tokio::fs::copy(image.path(), target_dir.join(&name)).await?;

        let reference = format!("/{}/{}", relative_dir, name);
        info!("Stored {} locally at {}", image.original_name(), reference);
        Ok(reference)
    }

    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(reference)?;
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(reference.to_string()),
            _ => StorageError::Io(e),
        })
    }
}
