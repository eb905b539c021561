//! In-memory feed store
//!
//! Reference `FeedStore` implementation backed by a single worker task that
//! owns the snapshot slot. All requests queue through one channel, so
//! operations issued concurrently execute and complete in issue order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::store::{dispatch, CachedFeed, FeedStore, LocalFeedItem, StoreError, StoreRequest};

/// A feed store that keeps its snapshot in process memory
///
/// Useful as a test double and for callers that want caching semantics without
/// durability. Must be created inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct InMemoryFeedStore {
    requests: mpsc::UnboundedSender<StoreRequest>,
}

impl InMemoryFeedStore {
    /// Creates an empty in-memory store and spawns its worker task
    ///
    /// The worker exits once every handle to the store has been dropped.
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut slot: Option<CachedFeed> = None;

            while let Some(request) = rx.recv().await {
                match request {
                    StoreRequest::Retrieve(reply) => {
                        let _ = reply.send(Ok(slot.clone()));
                    }
                    StoreRequest::Insert(feed, timestamp, reply) => {
                        slot = Some(CachedFeed { feed, timestamp });
                        let _ = reply.send(Ok(()));
                    }
                    StoreRequest::Delete(reply) => {
                        slot = None;
                        let _ = reply.send(Ok(()));
                    }
                }
            }
        });

        Self { requests: tx }
    }
}

impl Default for InMemoryFeedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
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
