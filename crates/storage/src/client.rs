//! S3-compatible storage client.

use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_s3::primitives::ByteStream;

/// Storage settings.
///
/// | Env Var              | Default            |
/// |----------------------|--------------------|
/// | `STORAGE_BUCKET`     | `proposition-pdfs` |
/// | `STORAGE_REGION`     | `us-east-1`        |
/// | `STORAGE_ENDPOINT`   | (unset — AWS)      |
/// | `STORAGE_ACCESS_KEY` | (unset)            |
/// | `STORAGE_SECRET_KEY` | (unset)            |
/// | `STORAGE_PUBLIC_URL` | (unset)            |
///
/// When `STORAGE_ENDPOINT` is set the client uses path-style addressing,
/// which is what MinIO-style and Supabase-style S3 endpoints expect. When
/// the access/secret pair is unset the SDK's default credential chain is
/// used.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Base URL for public object links, overriding the derived one.
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            bucket: std::env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "proposition-pdfs".into()),
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".into()),
            endpoint_url: std::env::var("STORAGE_ENDPOINT").ok(),
            access_key: std::env::var("STORAGE_ACCESS_KEY").ok(),
            secret_key: std::env::var("STORAGE_SECRET_KEY").ok(),
            public_base_url: std::env::var("STORAGE_PUBLIC_URL").ok(),
        }
    }
}

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload failed for {key}: {message}")]
    Upload { key: String, message: String },

    #[error("Delete failed for {key}: {message}")]
    Delete { key: String, message: String },
}

/// Build the object key for a proposition PDF.
///
/// `propositions/{year}/{proposition_id}/{filename}.pdf`, with the year
/// segment omitted when unknown.
pub fn object_key(proposition_id: i64, filename: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("propositions/{year}/{proposition_id}/{filename}.pdf"),
        None => format!("propositions/{proposition_id}/{filename}.pdf"),
    }
}

/// Client for the PDF bucket.
pub struct StorageClient {
    s3: aws_sdk_s3::Client,
    config: StorageConfig,
}

impl StorageClient {
    /// Build the SDK client from configuration.
    pub async fn new(config: StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            loader = loader.credentials_provider(aws_credential_types::Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None,
                None,
                "plenario-storage",
            ));
        }

        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint.clone()).force_path_style(true);
        }

        Self {
            s3: aws_sdk_s3::Client::from_conf(builder.build()),
            config,
        }
    }

    /// Upload a proposition PDF and return its public URL.
    pub async fn upload_pdf(
        &self,
        bytes: Vec<u8>,
        proposition_id: i64,
        filename: &str,
        year: Option<i32>,
    ) -> Result<String, StorageError> {
        let key = object_key(proposition_id, filename, year);
        let size = bytes.len();

        self.s3
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type("application/pdf")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.clone(),
                message: e.to_string(),
            })?;

        tracing::info!(key = %key, size, "PDF uploaded");
        Ok(self.public_url(&key))
    }

    /// Public URL for an object key.
    pub fn public_url(&self, key: &str) -> String {
        if let Some(base) = &self.config.public_base_url {
            return format!("{}/{key}", base.trim_end_matches('/'));
        }
        if let Some(endpoint) = &self.config.endpoint_url {
            return format!(
                "{}/{}/{key}",
                endpoint.trim_end_matches('/'),
                self.config.bucket
            );
        }
        format!(
            "https://{}.s3.{}.amazonaws.com/{key}",
            self.config.bucket, self.config.region
        )
    }

    /// Delete a stored PDF by key.
    pub async fn delete_pdf(&self, key: &str) -> Result<(), StorageError> {
        self.s3
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(key, "PDF deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
