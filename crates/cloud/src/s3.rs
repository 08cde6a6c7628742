//! AWS S3 (and S3-compatible) object store.

use std::path::Path;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use babycontest_core::naming::{object_url, path_style_object_url};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::store::ObjectStore;

/// Connection settings for [`S3ObjectStore`].
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint (MinIO etc.). Switches to path-style addressing.
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// S3 implementation of [`ObjectStore`].
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
}

impl S3ObjectStore {
    /// Build a client from settings, falling back to the default AWS
    /// credential chain when no static keys are given.
    pub async fn new(settings: &S3Settings) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        if let (Some(access_key), Some(secret_key)) =
            (&settings.access_key_id, &settings.secret_access_key)
        {
            let credentials =
                Credentials::new(access_key, secret_key, None, None, "StaticCredentialsProvider");
            builder = builder.credentials_provider(credentials);
        }

        if let Some(endpoint) = &settings.endpoint {
            info!(endpoint = %endpoint, "Using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());
        info!(
            bucket = %settings.bucket,
            region = %settings.region,
            "Created S3 client"
        );

        Self {
            client,
            bucket: settings.bucket.clone(),
            region: settings.region.clone(),
            endpoint: settings.endpoint.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::LocalRead(path.display().to_string(), e.to_string()))?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body);
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request
            .send()
            .await
            .map_err(|e| classify_put_error(&self.bucket, key, e))?;

        debug!(bucket = %self.bucket, key, "Uploaded object to S3");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => path_style_object_url(endpoint, &self.bucket, key),
            None => object_url(&self.bucket, &self.region, key),
        }
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}

/// Map an SDK failure onto [`StorageError`], keeping the full error chain in
/// the message.
fn classify_put_error<R: std::fmt::Debug>(
    bucket: &str,
    key: &str,
    err: SdkError<PutObjectError, R>,
) -> StorageError {
    let detail = DisplayErrorContext(&err).to_string();

    if let SdkError::ServiceError(ref service_err) = err {
        match service_err.err().code() {
            Some("NoSuchBucket") => return StorageError::NoSuchBucket(bucket.to_string()),
            Some("AccessDenied") => return StorageError::AccessDenied(key.to_string(), detail),
            _ => {}
        }
    }

    StorageError::Upload(key.to_string(), detail)
}
