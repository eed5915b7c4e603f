use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    types::ObjectCannedAcl,
};

use crate::{
    config::S3Settings,
    domain::error::StorageError,
    infrastructure::s3_blob_store::{ObjectStorageProvider, PutObjectRequest},
};

const CREDENTIALS_PROVIDER_NAME: &str = "registration-api-config";

#[derive(Clone)]
pub struct AwsS3Provider {
    client: Client,
    bucket: String,
    base_url: String,
}

impl AwsS3Provider {
    pub fn new(settings: &S3Settings) -> Self {
        let credentials = Credentials::new(
            settings.access_key_id.clone(),
            settings.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .build();

        Self {
            client: Client::from_conf(config),
            bucket: settings.bucket.clone(),
            base_url: format!(
                "https://{}.s3.{}.amazonaws.com/",
                settings.bucket, settings.region
            ),
        }
    }

    /// Virtual-hosted style URL of an object in this bucket
    fn object_url(&self, key: &str) -> String {
        format!("{}{}", self.base_url, key)
    }

    fn key_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.base_url.as_str())
            .filter(|key| !key.is_empty())
    }
}

#[async_trait]
impl ObjectStorageProvider for AwsS3Provider {
    async fn put_object(&self, request: PutObjectRequest<'_>) -> Result<Option<String>, StorageError> {
        let mut put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(request.key)
            .content_type(request.content_type)
            .body(ByteStream::from(request.body));
        if request.public_read {
            put = put.acl(ObjectCannedAcl::PublicRead);
        }

        let output = put
            .send()
            .await
            .map_err(|e| StorageError::Upload(DisplayErrorContext(&e).to_string()))?;

        // an accepted object always carries an ETag
        Ok(output.e_tag().map(|_| self.object_url(request.key)))
    }

    async fn get_object(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let key = self
            .key_of(url)
            .ok_or_else(|| StorageError::InvalidReference(url.to_string()))?;

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|err| err.is_no_such_key()) {
                    StorageError::NotFound(url.to_string())
                } else {
                    StorageError::Download(DisplayErrorContext(&e).to_string())
                }
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Download(e.to_string()))?;

        Ok(body.into_bytes().to_vec())
    }
}
