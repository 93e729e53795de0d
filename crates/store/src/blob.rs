//! Media blob stores.

use crate::error::{Result, StoreError};
use crate::traits::BlobStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
struct Blob {
    bytes: Vec<u8>,
    content_type: String,
}

/// Keeps blobs in memory and hands out `memory://` URLs
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Blob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.blobs.read().await.contains_key(path)
    }

    pub async fn content_type(&self, path: &str) -> Option<String> {
        self.blobs
            .read()
            .await
            .get(path)
            .map(|blob| blob.content_type.clone())
    }

    pub async fn size(&self, path: &str) -> Option<usize> {
        self.blobs.read().await.get(path).map(|blob| blob.bytes.len())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        self.blobs.write().await.insert(
            path.to_string(),
            Blob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(self.url(path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.blobs
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("blobs", path))
    }

    fn url(&self, path: &str) -> String {
        format!("memory://{}", path)
    }
}

/// Writes blobs under a root directory on the local filesystem
#[derive(Debug, Clone)]
pub struct DirBlobStore {
    root: PathBuf,
}

impl DirBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a blob path under the root, refusing `..` and absolute paths
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || path.is_empty() {
            return Err(StoreError::InvalidDocument(format!(
                "invalid blob path: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for DirBlobStore {
    #[instrument(skip(self, bytes))]
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;
        debug!("Wrote {} bytes to {:?}", bytes.len(), target);
        Ok(self.url(path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::not_found("blobs", path))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("file://{}", self.root.join(path).display())
    }
}
