//! File-backed feed store
//!
//! Durable `FeedStore` implementation that persists the snapshot as a JSON
//! file in an XDG-compliant cache directory (`~/.cache/feedcache/` on Linux).
//! Like the in-memory store, every request runs on a single worker task that
//! owns the file path, so operations complete in strict issue order.
//!
//! The snapshot invariant is atomicity: a reader never observes a partially
//! written file. Inserts write to a sibling temp file and rename it over the
//! final path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::mpsc;

use super::store::{dispatch, CachedFeed, FeedStore, LocalFeedItem, StoreError, StoreRequest};

/// File name of the persisted snapshot inside the cache directory
const SNAPSHOT_FILE: &str = "feed.json";

/// A feed store that persists its snapshot to a JSON file
#[derive(Debug, Clone)]
pub struct FileFeedStore {
    requests: mpsc::UnboundedSender<StoreRequest>,
}

impl FileFeedStore {
    /// Creates a store rooted at the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory). Must be called inside a tokio runtime.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "feedcache")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a store rooted at a custom directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let path = cache_dir.join(SNAPSHOT_FILE);

        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                match request {
                    StoreRequest::Retrieve(reply) => {
                        let _ = reply.send(read_snapshot(&path).await);
                    }
                    StoreRequest::Insert(feed, timestamp, reply) => {
                        let snapshot = CachedFeed { feed, timestamp };
                        let _ = reply.send(write_snapshot(&path, &snapshot).await);
                    }
                    StoreRequest::Delete(reply) => {
                        let _ = reply.send(delete_snapshot(&path).await);
                    }
                }
            }
        });

        Self { requests: tx }
    }
}

/// Reads and decodes the snapshot file; a missing file means an empty store
async fn read_snapshot(path: &Path) -> Result<Option<CachedFeed>, StoreError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(StoreError::Io(error)),
    };

    let snapshot = serde_json::from_str(&content)
        .map_err(|error| StoreError::Corrupt(error.to_string()))?;
    Ok(Some(snapshot))
}

/// Writes the snapshot atomically: temp file first, then rename into place
async fn write_snapshot(path: &Path, snapshot: &CachedFeed) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }

    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|error| StoreError::Corrupt(error.to_string()))?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json).await?;
    fs::rename(&tmp_path, path).await?;
    Ok(())
}

/// Removes the snapshot file; deleting an already-empty store succeeds
async fn delete_snapshot(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
        Err(error) => Err(StoreError::Io(error)),
    }
}

#[async_trait]
impl FeedStore for FileFeedStore {
    async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
        dispatch(&self.requests, StoreRequest::Retrieve).await
    }

    async fn insert(
        &self,
        feed: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        dispatch(&self.requests, |reply| {
            StoreRequest::Insert(feed, timestamp, reply)
        })
        .await
    }

    async fn delete(&self) -> Result<(), StoreError> {
        dispatch(&self.requests, StoreRequest::Delete).await
    }
}
