//! Blob storage for QR images and message attachments.
//!
//! Stored blobs are exposed to the IRC client as links; see [`crate::http`]
//! for the endpoint that serves them.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("empty blob")]
    Empty,

    #[error("blob too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("invalid blob name: {0}")]
    InvalidName(String),

    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("blob storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores bytes under a suggested name and returns a retrievable reference.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, name: &str, data: &[u8]) -> Result<String, BlobError>;
}

/// Content-derived attachment name: hex SHA-256 plus the original extension.
pub fn attachment_name(data: &[u8], filename: &str) -> String {
    let digest = Sha256::digest(data);
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{hex}.{}", ext.to_ascii_lowercase()),
        _ => hex,
    }
}

/// Keep only characters that are safe in a file name and a URL path segment.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

/// Reject names that would resolve outside `base`.
fn ensure_within(base: &Path, name: &str) -> Result<PathBuf, BlobError> {
    let mut resolved = base.to_path_buf();
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) => resolved.push(c),
        _ => return Err(BlobError::InvalidName(name.to_string())),
    }
    if !resolved.starts_with(base) {
        return Err(BlobError::InvalidName(name.to_string()));
    }
    Ok(resolved)
}

/// Filesystem-backed store returning `<base_url>/<name>` references.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    base_path: PathBuf,
    base_url: String,
    max_size: usize,
}

impl FsBlobStore {
    pub async fn new(
        base_path: PathBuf,
        base_url: impl Into<String>,
        max_size: usize,
    ) -> Result<Self, BlobError> {
        fs::create_dir_all(&base_path).await?;
        info!(path = %base_path.display(), "Blob store initialized");

        Ok(Self {
            base_path,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Read a stored blob back by name.
    pub async fn get(&self, name: &str) -> Result<Vec<u8>, BlobError> {
        if sanitize_name(name) != name {
            return Err(BlobError::InvalidName(name.to_string()));
        }
        let path = ensure_within(&self.base_path, name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, name: &str, data: &[u8]) -> Result<String, BlobError> {
        if data.is_empty() {
            return Err(BlobError::Empty);
        }
        if data.len() > self.max_size {
            return Err(BlobError::TooLarge {
                size: data.len(),
                max: self.max_size,
            });
        }

        let mut name = sanitize_name(name);
        if name.is_empty() {
            name = Uuid::new_v4().to_string();
        }
        let path = ensure_within(&self.base_path, &name)?;

        fs::write(&path, data).await?;
        debug!(name = %name, size = data.len(), "Stored blob");

        Ok(format!("{}/{}", self.base_url, name))
    }
}
