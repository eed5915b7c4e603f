use async_trait::async_trait;
use tracing::info;

use crate::domain::{
    error::StorageError,
    models::image::DecodedImage,
    services::blob_store::{BlobStore, generate_object_name},
};

/// Single object upload handed to an object-storage provider
#[derive(Debug)]
pub struct PutObjectRequest<'a> {
    pub key: &'a str,
    pub body: Vec<u8>,
    pub content_type: &'a str,
    pub public_read: bool,
}

/// Object storage bucket the remote blob store talks to
#[async_trait]
pub trait ObjectStorageProvider: Send + Sync {
    /// Upload and return the object's URL, `None` if the provider gave no locator
    async fn put_object(&self, request: PutObjectRequest<'_>) -> Result<Option<String>, StorageError>;

    /// Download an object by the URL `put_object` returned
    async fn get_object(&self, url: &str) -> Result<Vec<u8>, StorageError>;
}

/// Stores media in a bucket under `<directory>/<name>`, publicly readable.
pub struct S3BlobStore<P: ObjectStorageProvider> {
    provider: P,
}

impl<P: ObjectStorageProvider> S3BlobStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: ObjectStorageProvider> BlobStore for S3BlobStore<P> {
    async fn store(&self, image: &DecodedImage, directory: &str) -> Result<String, StorageError> {
        let key = format!(
            "{}/{}",
            directory.trim_matches('/'),
            generate_object_name(image.extension())
        );
        let body = tokio::fs::read(image.path()).await?;

        let url = self
            .provider
            .put_object(PutObjectRequest {
                key: &key,
                body,
                content_type: image.content_type(),
                public_read: true,
            })
            .await?
            .ok_or_else(|| StorageError::MissingLocator(key.clone()))?;

        info!("Uploaded {} to object storage at {}", image.original_name(), url);
        Ok(url)
    }

    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        self.provider.get_object(reference).await
    }
}

#[cfg(test)]
pub(crate) mod in_memory {
    use std::{collections::HashMap, sync::Mutex};

    use super::*;

    pub const BASE_URL: &str = "https://bucket.s3.test.amazonaws.com/";

    // bucket kept in memory, keyed by object key
    #[derive(Default)]
    pub struct InMemoryBucket {
        pub objects: Mutex<HashMap<String, (Vec<u8>, String, bool)>>,
        pub withhold_locator: bool,
    }

    #[async_trait]
    impl ObjectStorageProvider for InMemoryBucket {
        async fn put_object(&self, request: PutObjectRequest<'_>) -> Result<Option<String>, StorageError> {
            self.objects.lock().unwrap().insert(
                request.key.to_string(),
                (request.body, request.content_type.to_string(), request.public_read),
            );
            if self.withhold_locator {
                Ok(None)
            } else {
                Ok(Some(format!("{}{}", BASE_URL, request.key)))
            }
        }

        async fn get_object(&self, url: &str) -> Result<Vec<u8>, StorageError> {
            let key = url
                .strip_prefix(BASE_URL)
                .ok_or_else(|| StorageError::InvalidReference(url.to_string()))?;
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .map(|(body, _, _)| body.clone())
                .ok_or_else(|| StorageError::NotFound(url.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    use super::{in_memory::*, *};
    use crate::{
        domain::services::image_service::ImageDecoder,
        infrastructure::base64_image_decoder::Base64ImageDecoder,
    };

    const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00";

    fn decoded() -> DecodedImage {
        Base64ImageDecoder::new()
            .decode(&STANDARD.encode(GIF_BYTES))
            .unwrap()
    }

    #[tokio::test]
    async fn test_store_uploads_public_object_positive() {
        let store = S3BlobStore::new(InMemoryBucket::default());

        let url = store.store(&decoded(), "avatars").await.unwrap();

        assert!(url.starts_with(&format!("{}avatars/", BASE_URL)));
        assert!(url.ends_with(".gif"));
        let objects = store.provider.objects.lock().unwrap();
        let (_, content_type, public_read) = objects.values().next().unwrap();
        assert_eq!(content_type, "image/gif");
        assert!(*public_read);
    }

    #[tokio::test]
    async fn test_store_then_fetch_positive() {
        let store = S3BlobStore::new(InMemoryBucket::default());
        let image = decoded();

        let first = store.store(&image, "photos").await.unwrap();
        let second = store.store(&image, "photos").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.fetch(&first).await.unwrap(), GIF_BYTES);
    }

    #[tokio::test]
    async fn test_store_without_locator_negative() {
        let store = S3BlobStore::new(InMemoryBucket {
            withhold_locator: true,
            ..Default::default()
        });

        let result = store.store(&decoded(), "photos").await;
        assert!(matches!(result, Err(StorageError::MissingLocator(key)) if key.starts_with("photos/")));
    }
}
