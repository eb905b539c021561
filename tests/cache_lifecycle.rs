//! End-to-end cache lifecycle tests
//!
//! Exercises the coordinator against the real store implementations: first
//! reads, replacement saves, the freshness boundary, failure recovery, and
//! scheduled validation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::oneshot;
use uuid::Uuid;

use feedcache::{
    CachedFeed, Clock, FeedItem, FeedStore, FileFeedStore, InMemoryFeedStore, LocalFeedCache,
    LocalFeedItem, SaveError, StoreError,
};

/// A clock whose current time the test can move
fn adjustable_clock(start: DateTime<Utc>) -> (Clock, Arc<Mutex<DateTime<Utc>>>) {
    let handle = Arc::new(Mutex::new(start));
    let reader = Arc::clone(&handle);
    let clock: Clock = Arc::new(move || *reader.lock().unwrap());
    (clock, handle)
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap()
}

fn sample_feed() -> Vec<FeedItem> {
    vec![
        FeedItem::new(
            Uuid::new_v4(),
            None,
            Some("X".to_string()),
            "http://a.com/1",
        ),
        FeedItem::new(
            Uuid::new_v4(),
            Some("second item".to_string()),
            None,
            "http://a.com/2",
        ),
    ]
}

async fn save<S: FeedStore + 'static>(
    cache: &LocalFeedCache<S>,
    feed: Vec<FeedItem>,
) -> Result<(), SaveError> {
    let (tx, rx) = oneshot::channel();
    cache.save(feed, move |result| {
        let _ = tx.send(result);
    });
    rx.await.expect("save completion should be delivered")
}

async fn load<S: FeedStore + 'static>(
    cache: &LocalFeedCache<S>,
) -> Result<Vec<FeedItem>, StoreError> {
    let (tx, rx) = oneshot::channel();
    cache.load(move |result| {
        let _ = tx.send(result);
    });
    rx.await.expect("load completion should be delivered")
}

#[tokio::test]
async fn test_load_on_never_written_store_is_empty_and_repeatable() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileFeedStore::with_dir(temp_dir.path().to_path_buf()));
    let cache = LocalFeedCache::new(store);

    for _ in 0..3 {
        assert_eq!(load(&cache).await.unwrap(), Vec::<FeedItem>::new());
    }

    // Reading must not create any file.
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_save_then_load_roundtrips_the_feed() {
    let store = Arc::new(InMemoryFeedStore::new());
    let cache = LocalFeedCache::new(store);
    let feed = sample_feed();

    save(&cache, feed.clone()).await.unwrap();

    assert_eq!(load(&cache).await.unwrap(), feed);
}

#[tokio::test]
async fn test_save_replaces_previously_saved_feed() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileFeedStore::with_dir(temp_dir.path().to_path_buf()));
    let cache = LocalFeedCache::new(store);
    let first = sample_feed();
    let second = sample_feed();

    save(&cache, first).await.unwrap();
    save(&cache, second.clone()).await.unwrap();

    assert_eq!(load(&cache).await.unwrap(), second);
}

#[tokio::test]
async fn test_saved_feed_survives_a_new_store_instance() {
    let temp_dir = TempDir::new().unwrap();
    let feed = sample_feed();

    {
        let store = Arc::new(FileFeedStore::with_dir(temp_dir.path().to_path_buf()));
        let cache = LocalFeedCache::new(store);
        save(&cache, feed.clone()).await.unwrap();
    }

    let store = Arc::new(FileFeedStore::with_dir(temp_dir.path().to_path_buf()));
    let cache = LocalFeedCache::new(store);

    assert_eq!(load(&cache).await.unwrap(), feed);
}

#[tokio::test]
async fn test_feed_is_served_until_the_seven_day_boundary() {
    let (clock, now) = adjustable_clock(t0());
    let store = Arc::new(InMemoryFeedStore::new());
    let cache = LocalFeedCache::with_clock(store, clock);
    let feed = sample_feed();

    save(&cache, feed.clone()).await.unwrap();

    *now.lock().unwrap() = t0() + Duration::days(7) - Duration::seconds(1);
    assert_eq!(load(&cache).await.unwrap(), feed);

    *now.lock().unwrap() = t0() + Duration::days(7);
    assert_eq!(load(&cache).await.unwrap(), Vec::<FeedItem>::new());

    *now.lock().unwrap() = t0() + Duration::days(30);
    assert_eq!(load(&cache).await.unwrap(), Vec::<FeedItem>::new());
}

#[tokio::test]
async fn test_validate_prunes_expired_feed() {
    let (clock, now) = adjustable_clock(t0());
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileFeedStore::with_dir(temp_dir.path().to_path_buf()));
    let cache = LocalFeedCache::with_clock(Arc::clone(&store), clock);
    let feed = sample_feed();

    save(&cache, feed.clone()).await.unwrap();

    *now.lock().unwrap() = t0() + Duration::seconds(1);
    assert_eq!(load(&cache).await.unwrap(), feed);

    *now.lock().unwrap() = t0() + Duration::days(8);
    cache.validate_cache();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    // The snapshot is gone from the store itself, not just filtered on read.
    assert!(store.retrieve().await.unwrap().is_none());
    assert_eq!(load(&cache).await.unwrap(), Vec::<FeedItem>::new());
}

#[tokio::test]
async fn test_validate_keeps_fresh_feed() {
    let (clock, now) = adjustable_clock(t0());
    let store = Arc::new(InMemoryFeedStore::new());
    let cache = LocalFeedCache::with_clock(Arc::clone(&store), clock);
    let feed = sample_feed();

    save(&cache, feed.clone()).await.unwrap();

    *now.lock().unwrap() = t0() + Duration::days(6);
    cache.validate_cache();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert_eq!(load(&cache).await.unwrap(), feed);
}

/// Store wrapper that fails every insert, for exercising the
/// delete-succeeded-insert-failed path
struct InsertFailingStore {
    inner: InMemoryFeedStore,
}

#[async_trait::async_trait]
impl FeedStore for InsertFailingStore {
    async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
        self.inner.retrieve().await
    }

    async fn insert(
        &self,
        _feed: Vec<LocalFeedItem>,
        _timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Corrupt("disk full".to_string()))
    }

    async fn delete(&self) -> Result<(), StoreError> {
        self.inner.delete().await
    }
}

#[tokio::test]
async fn test_failed_insert_leaves_an_empty_cache() {
    let inner = InMemoryFeedStore::new();
    let seeded = LocalFeedCache::new(Arc::new(inner.clone()));
    save(&seeded, sample_feed()).await.unwrap();

    let failing = Arc::new(InsertFailingStore { inner: inner.clone() });
    let cache = LocalFeedCache::new(failing);

    let result = save(&cache, sample_feed()).await;
    assert!(matches!(result, Err(SaveError::Insertion(_))));

    // The old snapshot was deleted and nothing replaced it: empty beats stale.
    let reader = LocalFeedCache::new(Arc::new(inner));
    assert_eq!(load(&reader).await.unwrap(), Vec::<FeedItem>::new());
}
