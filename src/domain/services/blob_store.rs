use async_trait::async_trait;

use crate::domain::{error::StorageError, models::image::DecodedImage};

/// Durable storage for uploaded media.
///
/// `store` returns a reference that is enough on its own to get the bytes
/// back through `fetch`. Every call generates a fresh name, so concurrent
/// uploads never overwrite each other.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, image: &DecodedImage, directory: &str) -> Result<String, StorageError>;

    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, StorageError>;
}

/// Name for a newly stored object: a v4 uuid plus the original extension.
pub fn generate_object_name(extension: &str) -> String {
    format!("{}.{}", uuid::Uuid::new_v4().simple(), extension)
}
