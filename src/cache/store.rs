//! Store contract and cache-side record types
//!
//! A store holds at most one snapshot of the feed at a time. Implementations
//! own their serialization: concurrent retrieve/insert/delete calls against
//! the same store must execute, and complete, in strict FIFO issue order so a
//! delete-then-insert pair can never be split by a concurrent read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::feed::FeedItem;

/// Errors raised by a feed store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying storage I/O failed
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted snapshot exists but cannot be decoded
    #[error("cached snapshot is corrupt: {0}")]
    Corrupt(String),

    /// The store's worker task is gone and can no longer serve requests
    #[error("store is unavailable")]
    Unavailable,
}

/// The store-side mirror of a `FeedItem`
///
/// Kept separate from the domain model so the persisted encoding can evolve
/// without touching `FeedItem`, and so the domain model never needs to derive
/// serde traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFeedItem {
    /// Unique identifier for the item
    pub id: Uuid,
    /// Optional descriptive text
    pub description: Option<String>,
    /// Optional location text
    pub location: Option<String>,
    /// URL of the item's image
    #[serde(rename = "image")]
    pub image_url: String,
}

impl From<FeedItem> for LocalFeedItem {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.id,
            description: item.description,
            location: item.location,
            image_url: item.image_url,
        }
    }
}

impl From<LocalFeedItem> for FeedItem {
    fn from(item: LocalFeedItem) -> Self {
        Self {
            id: item.id,
            description: item.description,
            location: item.location,
            image_url: item.image_url,
        }
    }
}

/// The entire cached content of a store at one moment
///
/// A snapshot is written atomically: a reader either observes the whole
/// snapshot or none of it, never a partial one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFeed {
    /// The cached feed items, in feed order
    pub feed: Vec<LocalFeedItem>,
    /// When the snapshot was written
    pub timestamp: DateTime<Utc>,
}

/// Durable persistence for a single feed snapshot
///
/// Completions may land on any task; the store, not its callers, is
/// responsible for serializing access to the underlying storage.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Reads the current snapshot; `Ok(None)` means the store is empty
    async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError>;

    /// Replaces the store content with a new snapshot
    async fn insert(
        &self,
        feed: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Empties the store; deleting an already-empty store succeeds
    async fn delete(&self) -> Result<(), StoreError>;
}

/// A single queued store operation with its reply channel
///
/// Both reference stores funnel requests through an unbounded channel into one
/// worker task. The channel preserves send order and the worker handles one
/// request at a time, which is what gives the FIFO completion guarantee.
pub(crate) enum StoreRequest {
    Retrieve(oneshot::Sender<Result<Option<CachedFeed>, StoreError>>),
    Insert(
        Vec<LocalFeedItem>,
        DateTime<Utc>,
        oneshot::Sender<Result<(), StoreError>>,
    ),
    Delete(oneshot::Sender<Result<(), StoreError>>),
}

/// Sends a request to a store worker and awaits its reply
///
/// A closed channel in either direction means the worker is gone.
pub(crate) async fn dispatch<T>(
    tx: &mpsc::UnboundedSender<StoreRequest>,
    make: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest,
) -> Result<T, StoreError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(make(reply_tx)).map_err(|_| StoreError::Unavailable)?;
    reply_rx.await.map_err(|_| StoreError::Unavailable)?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> FeedItem {
        FeedItem::new(
            Uuid::new_v4(),
            Some("a description".to_string()),
            Some("a location".to_string()),
            "http://a.com/image",
        )
    }

    #[test]
    fn test_local_item_roundtrips_through_domain_model() {
        let item = sample_item();

        let local = LocalFeedItem::from(item.clone());
        let back = FeedItem::from(local);

        assert_eq!(back, item);
    }

    #[test]
    fn test_cached_feed_serialization_roundtrip() {
        let snapshot = CachedFeed {
            feed: vec![LocalFeedItem::from(sample_item())],
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&snapshot).expect("Failed to serialize snapshot");
        let decoded: CachedFeed =
            serde_json::from_str(&json).expect("Failed to deserialize snapshot");

        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_local_item_uses_image_key_in_encoding() {
        let local = LocalFeedItem::from(sample_item());

        let json = serde_json::to_string(&local).expect("Failed to serialize item");

        assert!(json.contains("\"image\""));
        assert!(!json.contains("image_url"));
    }
}
