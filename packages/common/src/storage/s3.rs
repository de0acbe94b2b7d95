use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::traits::{DEFAULT_SIGNED_URL_TTL_SECS, ObjectStore};

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3Options {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, GCS interop).
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub signed_url_ttl_secs: u32,
}

impl Default for S3Options {
    fn default() -> Self {
        Self {
            bucket: "creative-studio-assets".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            signed_url_ttl_secs: DEFAULT_SIGNED_URL_TTL_SECS,
        }
    }
}

/// Object store backed by an S3-compatible bucket.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    ttl_secs: u32,
}

impl S3ObjectStore {
    pub fn connect(opts: &S3Options) -> Result<Self, StorageError> {
        let region = match &opts.endpoint {
            Some(endpoint) => Region::Custom {
                region: opts.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => opts
                .region
                .parse()
                .map_err(|e| StorageError::Config(format!("invalid region: {e}")))?,
        };

        let credentials = match (&opts.access_key, &opts.secret_key) {
            (Some(access), Some(secret)) => {
                Credentials::new(Some(access.as_str()), Some(secret.as_str()), None, None, None)
            }
            // Fall back to the ambient credential chain (env, profile, IAM).
            _ => Credentials::default(),
        }
        .map_err(|e| StorageError::Config(format!("credentials: {e}")))?;

        let mut bucket = Bucket::new(&opts.bucket, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?;
        if opts.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            ttl_secs: opts.signed_url_ttl_secs,
        })
    }

    fn map_err(key: &str, err: S3Error) -> StorageError {
        match err {
            S3Error::HttpFailWithBody(404, _) => StorageError::NotFound(key.to_string()),
            other => StorageError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError> {
        self.bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| Self::map_err(key, e))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| Self::map_err(key, e))?;
        Ok(response.to_vec())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self.bucket.head_object(key).await {
            Ok(_) => Ok(true),
            Err(S3Error::HttpFailWithBody(404, _)) => Ok(false),
            Err(e) => Err(StorageError::Transport(e.to_string())),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let pages = self
            .bucket
            .list(prefix.to_string(), None)
            .await
            .map_err(|e| Self::map_err(prefix, e))?;
        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents)
            .map(|object| object.key)
            .collect())
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<(), StorageError> {
        let status = self
            .bucket
            .copy_object_internal(src, dst)
            .await
            .map_err(|e| Self::map_err(src, e))?;
        if !(200..300).contains(&status) {
            return Err(StorageError::Transport(format!(
                "copy {src} -> {dst} returned status {status}"
            )));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        match self.bucket.delete_object(key).await {
            Ok(_) => Ok(true),
            Err(S3Error::HttpFailWithBody(404, _)) => Ok(false),
            Err(e) => Err(StorageError::Transport(e.to_string())),
        }
    }

    async fn presign(&self, key: &str) -> Result<String, StorageError> {
        self.bucket
            .presign_get(key, self.ttl_secs, None)
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))
    }
}
