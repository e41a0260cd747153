use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;
use url::Url;
use uuid::Uuid;

use crate::error_handling::types::StoreError;
use crate::feed::{FeedItem, FeedSnapshot};
use crate::storage::storage_trait::Storage;

const FEED_FILE: &str = "feed.json";

/// Filesystem-backed store: one JSON snapshot file plus one blob file per
/// image URL, kept under a base directory.
///
/// Snapshot and blob writes go through a temp file in the target directory
/// followed by a rename, so a reader never observes a torn file: after a
/// failed insert the previous content (or the empty state) is still intact.
pub struct FileStorage {
    base_path: PathBuf,
    images_path: PathBuf,
    // Write half exclusive, read half shared: mutations issued against this
    // instance take effect in issue order, reads may run concurrently.
    gate: RwLock<()>,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StoreError> {
        let base_path = base_path.as_ref().to_path_buf();
        let images_path = base_path.join("images");

        fs::create_dir_all(&images_path).map_err(|e| { error!("Failed to create images dir {}: {}", images_path.display(), e); StoreError::WriteFailed })?;
        info!("FileStorage initialized at {}", base_path.display());

        Ok(Self {
            base_path,
            images_path,
            gate: RwLock::new(()),
        })
    }

    /// Construct FileStorage using env var FEEDCACHE_STORAGE_DIR if set, otherwise current directory.
    pub fn new_default() -> Result<Self, StoreError> {
        if let Ok(dir) = std::env::var("FEEDCACHE_STORAGE_DIR") {
            info!("Using FileStorage from FEEDCACHE_STORAGE_DIR: {}", dir);
            return Self::new(PathBuf::from(dir));
        }
        let cwd = std::env::current_dir().map_err(|e| { error!("Failed to get current dir: {}", e); StoreError::ReadFailed })?;
        info!("Using FileStorage at current directory: {}", cwd.display());
        Self::new(cwd)
    }

    fn feed_path(&self) -> PathBuf { self.base_path.join(FEED_FILE) }

    fn image_path(&self, url: &Url) -> PathBuf {
        let name = Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_str().as_bytes());
        self.images_path.join(format!("{}.bin", name))
    }

    /// Writes `bytes` to `path` via a temp file in `dir` plus an atomic rename.
    async fn write_atomic(dir: PathBuf, path: PathBuf, bytes: Vec<u8>) -> Result<(), StoreError> {
        tokio::task::spawn_blocking(move || {
            let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| { error!("Failed to create temp file in {}: {}", dir.display(), e); StoreError::WriteFailed })?;
            tmp.write_all(&bytes).map_err(|e| { error!("Failed to write temp file for {}: {}", path.display(), e); StoreError::WriteFailed })?;
            tmp.persist(&path).map_err(|e| { error!("Failed to persist {}: {}", path.display(), e); StoreError::WriteFailed })?;
            Ok(())
        })
        .await
        .map_err(|e| { error!("Blocking write task failed: {}", e); StoreError::WriteFailed })?
    }
}

#[async_trait::async_trait]
impl Storage for FileStorage {
    async fn delete_cached_feed(&self) -> Result<(), StoreError> {
        let _guard = self.gate.write().await;
        let path = self.feed_path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted cached feed at {}", path.display());
                Ok(())
            }
            // An empty cache is already the requested end state.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => { error!("Failed to delete {}: {}", path.display(), e); Err(StoreError::WriteFailed) }
        }
    }

    async fn insert(&self, items: &[FeedItem], timestamp: DateTime<Utc>) -> Result<(), StoreError> {
        let _guard = self.gate.write().await;
        let snapshot = FeedSnapshot { items: items.to_vec(), timestamp };
        let bytes = serde_json::to_vec(&snapshot).map_err(|e| { error!("Failed to encode feed snapshot: {}", e); StoreError::WriteFailed })?;
        Self::write_atomic(self.base_path.clone(), self.feed_path(), bytes).await?;
        debug!("Inserted feed snapshot with {} item(s), stamped {}", snapshot.items.len(), timestamp.to_rfc3339());
        Ok(())
    }

    async fn retrieve(&self) -> Result<Option<FeedSnapshot>, StoreError> {
        let _guard = self.gate.read().await;
        let path = self.feed_path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => { error!("Failed to read {}: {}", path.display(), e); return Err(StoreError::ReadFailed); }
        };
        let snapshot: FeedSnapshot = serde_json::from_slice(&bytes).map_err(|e| { error!("Corrupt feed snapshot at {}: {}", path.display(), e); StoreError::DecodeFailed })?;
        debug!("Retrieved feed snapshot with {} item(s)", snapshot.items.len());
        Ok(Some(snapshot))
    }

    async fn retrieve_image_data(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError> {
        let _guard = self.gate.read().await;
        let path = self.image_path(url);
        match tokio::fs::read(&path).await {
            Ok(data) => {
                debug!("Read {} byte(s) of image data for {}", data.len(), url);
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => { error!("Failed to read {}: {}", path.display(), e); Err(StoreError::ReadFailed) }
        }
    }

    async fn insert_image_data(&self, url: &Url, data: &[u8]) -> Result<(), StoreError> {
        let _guard = self.gate.write().await;
        Self::write_atomic(self.images_path.clone(), self.image_path(url), data.to_vec()).await?;
        debug!("Stored {} byte(s) of image data for {}", data.len(), url);
        Ok(())
    }
}
