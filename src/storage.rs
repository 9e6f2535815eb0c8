use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    presigning::PresigningConfig,
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::config::MediaConfig;

/// Upload keys embed a fresh UUID, so stored objects never change.
const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

/// Where uploaded meal photos live.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_image(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    async fn presigned_url(&self, key: &str, ttl: Duration) -> anyhow::Result<String>;
}

/// S3-compatible media bucket (MinIO in development).
#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    /// Builds a path-style client for the configured endpoint and makes sure
    /// the bucket exists. An unreachable endpoint is logged, not fatal: meals
    /// and users still work, uploads fail until it comes back.
    pub async fn connect(cfg: &MediaConfig) -> Self {
        let creds = Credentials::new(&cfg.access_key, &cfg.secret_key, None, None, "campus-chef-env");
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(creds)
            .load()
            .await;
        let s3 = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        let storage = Self {
            client: Client::from_conf(s3),
            bucket: cfg.bucket.clone(),
        };
        if let Err(e) = storage.ensure_bucket().await {
            warn!(bucket = %storage.bucket, error = %e, "media bucket not ready");
        }
        storage
    }

    async fn ensure_bucket(&self) -> anyhow::Result<()> {
        if self.client.head_bucket().bucket(&self.bucket).send().await.is_ok() {
            return Ok(());
        }
        self.client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .with_context(|| format!("create bucket {}", self.bucket))?;
        info!(bucket = %self.bucket, "created media bucket");
        Ok(())
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn put_image(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .cache_control(IMMUTABLE_CACHE)
            .body(ByteStream::from(body))
            .send()
            .await
            .context("s3 put_object")?;
        debug!(%key, size, "image stored");
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> anyhow::Result<String> {
        let signing = PresigningConfig::expires_in(ttl).context("presign ttl")?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(signing)
            .await
            .context("s3 presign get_object")?;
        Ok(request.uri().to_string())
    }
}
