use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::presigning::PresigningConfig;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// StorageError
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("content not found: {0}")]
    NotFound(String),

    #[error("invalid content key: {0}")]
    InvalidKey(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

// 1. ContentStore Contract
/// ContentStore
///
/// Abstract contract for reading content bodies (MDX sources, question JSON)
/// and resolving asset URLs. The filesystem store serves local development,
/// the S3 store serves production, and the mock backs the tests.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Reads the UTF-8 body stored under `key` (e.g. `documents/oop/about.mdx`).
    async fn read(&self, key: &str) -> Result<String, StorageError>;

    /// Resolves an asset key (e.g. `assets/icons/js.png`) to a URL a browser can fetch.
    async fn asset_url(&self, key: &str) -> Result<String, StorageError>;
}

/// sanitize_key
///
/// Normalizes a storage key: drops empty and `.` segments and rejects any
/// `..` segment, so a key can never escape the content root.
pub fn sanitize_key(key: &str) -> Result<String, StorageError> {
    let mut segments = Vec::new();
    for segment in key.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(StorageError::InvalidKey(key.to_string())),
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(segments.join("/"))
}

// 2. Filesystem Implementation (Local)
/// FsContentStore
///
/// Reads content from a local directory. Assets are served by the router's
/// `/assets` static file service, so asset URLs are plain paths.
#[derive(Clone, Debug)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn read(&self, key: &str) -> Result<String, StorageError> {
        let key = sanitize_key(key)?;
        let path = self.root.join(&key);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(key)),
            Err(e) => Err(StorageError::Backend(format!("{}: {}", path.display(), e))),
        }
    }

    async fn asset_url(&self, key: &str) -> Result<String, StorageError> {
        Ok(format!("/{}", sanitize_key(key)?))
    }
}

// 3. S3 Implementation (Production)
/// S3ContentStore
///
/// Reads content from an S3-compatible bucket. Works against AWS, MinIO and
/// Supabase Storage; `force_path_style(true)` is required by the latter two.
#[derive(Clone)]
pub struct S3ContentStore {
    client: s3::Client,
    bucket_name: String,
}

impl S3ContentStore {
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            bucket_name: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ContentStore for S3ContentStore {
    async fn read(&self, key: &str) -> Result<String, StorageError> {
        let key = sanitize_key(key)?;

        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let missing = e
                    .as_service_error()
                    .map(|service| service.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    return Err(StorageError::NotFound(key));
                }
                return Err(StorageError::Backend(e.to_string()));
            }
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?
            .into_bytes();

        String::from_utf8(bytes.to_vec())
            .map_err(|e| StorageError::Backend(format!("{} is not UTF-8: {}", key, e)))
    }

    /// Presigned GET, valid for one hour.
    async fn asset_url(&self, key: &str) -> Result<String, StorageError> {
        let key = sanitize_key(key)?;
        let presigning = PresigningConfig::expires_in(Duration::from_secs(3600))
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let presigned_req = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(presigned_req.uri().to_string())
    }
}

// 4. Mock Implementation (For Tests)
/// MockContentStore
///
/// In-memory store keyed by storage key. With `should_fail` set, every call
/// returns a backend error.
#[derive(Clone, Default)]
pub struct MockContentStore {
    pub entries: HashMap<String, String>,
    pub should_fail: bool,
}

impl MockContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            entries: HashMap::new(),
            should_fail: true,
        }
    }

    pub fn with(mut self, key: &str, body: &str) -> Self {
        self.entries.insert(key.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn read(&self, key: &str) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError::Backend(
                "Mock Storage Error: Simulation requested".to_string(),
            ));
        }
        let key = sanitize_key(key)?;
        self.entries
            .get(&key)
            .cloned()
            .ok_or(StorageError::NotFound(key))
    }

    async fn asset_url(&self, key: &str) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError::Backend(
                "Mock Storage Error: Simulation requested".to_string(),
            ));
        }
        Ok(format!(
            "http://localhost:9000/mock-bucket/{}?signature=fake",
            sanitize_key(key)?
        ))
    }
}

/// StorageState
///
/// The concrete type used to share the content store across the application state.
pub type StorageState = Arc<dyn ContentStore>;
