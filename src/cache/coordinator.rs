//! Cache coordinator
//!
//! `LocalFeedCache` is the only component that mutates a feed store. It
//! replaces the cached snapshot with a delete-then-insert transaction, serves
//! reads through the freshness policy, and prunes expired or unreadable
//! snapshots on demand.
//!
//! Every operation runs on a spawned task and reports back through a
//! completion callback. Each task captures a weak handle to the coordinator's
//! liveness token at issue time; once the coordinator is dropped, pending
//! completions become no-ops and a save that has not yet issued its insert
//! stops after the delete. The underlying store operation itself always runs
//! to completion.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};

use super::policy;
use super::store::{FeedStore, LocalFeedItem, StoreError};
use crate::feed::FeedItem;

/// Source of the current time, injectable for tests
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Errors surfaced by a cache save
///
/// The variant records which half of the replace transaction failed. After an
/// `Insertion` failure the cache is empty: the previous snapshot was already
/// deleted, and an empty cache is preferred over a stale one.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The previous snapshot could not be cleared; no insert was attempted
    #[error("could not clear the previous cache: {0}")]
    Deletion(#[source] StoreError),

    /// The new snapshot could not be written; the cache is now empty
    #[error("could not persist the new cache: {0}")]
    Insertion(#[source] StoreError),
}

/// Coordinates reads, replacements, and validation of a feed store
pub struct LocalFeedCache<S> {
    store: Arc<S>,
    clock: Clock,
    /// Liveness token; spawned operations hold a `Weak` to it
    liveness: Arc<()>,
}

impl<S: FeedStore + 'static> LocalFeedCache<S> {
    /// Creates a coordinator over `store` using the system clock
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(Utc::now))
    }

    /// Creates a coordinator with an injected clock
    pub fn with_clock(store: Arc<S>, clock: Clock) -> Self {
        Self {
            store,
            clock,
            liveness: Arc::new(()),
        }
    }

    /// Replaces the cache content with `feed`
    ///
    /// Deletes the previous snapshot first; a deletion failure is surfaced
    /// without attempting the insert, leaving the store no worse than before
    /// the call. On insertion failure the cache is left empty. The snapshot
    /// timestamp is read from the clock when the insert is issued.
    pub fn save<F>(&self, feed: Vec<FeedItem>, completion: F)
    where
        F: FnOnce(Result<(), SaveError>) + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let liveness = Arc::downgrade(&self.liveness);

        tokio::spawn(async move {
            let deletion = store.delete().await;
            if !is_live(&liveness) {
                return;
            }

            let outcome = match deletion {
                Err(error) => Err(SaveError::Deletion(error)),
                Ok(()) => {
                    let timestamp = clock();
                    let local = feed.into_iter().map(LocalFeedItem::from).collect();
                    store
                        .insert(local, timestamp)
                        .await
                        .map_err(SaveError::Insertion)
                }
            };

            if is_live(&liveness) {
                completion(outcome);
            }
        });
    }

    /// Reads the cached feed, applying the freshness policy
    ///
    /// An empty store and an expired snapshot both deliver `Ok(vec![])`;
    /// staleness is not an error. Retrieval failures are passed through
    /// unchanged. Loading never mutates the store.
    pub fn load<F>(&self, completion: F)
    where
        F: FnOnce(Result<Vec<FeedItem>, StoreError>) + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let liveness = Arc::downgrade(&self.liveness);

        tokio::spawn(async move {
            let retrieval = store.retrieve().await;
            if !is_live(&liveness) {
                return;
            }

            let outcome = match retrieval {
                Err(error) => Err(error),
                Ok(Some(snapshot)) if policy::is_valid(snapshot.timestamp, clock()) => {
                    Ok(snapshot.feed.into_iter().map(FeedItem::from).collect())
                }
                Ok(_) => Ok(Vec::new()),
            };

            if is_live(&liveness) {
                completion(outcome);
            }
        });
    }

    /// Deletes the snapshot if it is expired or unreadable
    ///
    /// Fire-and-forget: the caller gets no completion, and deletion failures
    /// are reported through the `log` facade. Keeping validation separate from
    /// `load` lets callers prune on a schedule (e.g., an app-lifecycle hook)
    /// while the read path stays side-effect free.
    pub fn validate_cache(&self) {
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let liveness = Arc::downgrade(&self.liveness);

        tokio::spawn(async move {
            let retrieval = store.retrieve().await;
            if !is_live(&liveness) {
                return;
            }

            let should_delete = match retrieval {
                Err(error) => {
                    log::warn!("cache validation could not read the store: {error}");
                    true
                }
                Ok(Some(snapshot)) => !policy::is_valid(snapshot.timestamp, clock()),
                Ok(None) => false,
            };

            if should_delete {
                if let Err(error) = store.delete().await {
                    log::warn!("cache validation could not clear the store: {error}");
                }
            }
        });
    }
}

/// True while the coordinator that issued the operation still exists
fn is_live(liveness: &Weak<()>) -> bool {
    liveness.upgrade().is_some()
}
