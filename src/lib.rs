//! Feedcache - a local cache layer for a remote feed
//!
//! This crate loads feed items from a remote HTTP source, persists a validated
//! local copy, and serves the cached copy subject to a staleness policy. The
//! cache layer owns the delete-then-insert transaction used to replace the
//! cached snapshot, and a validation pass that prunes expired or corrupt data.

pub mod cache;
pub mod feed;
pub mod remote;

pub use cache::{
    CachedFeed, Clock, FeedStore, FileFeedStore, InMemoryFeedStore, LocalFeedCache,
    LocalFeedItem, SaveError, StoreError,
};
pub use feed::FeedItem;
pub use remote::{
    HttpClient, HttpError, HttpResponse, RemoteError, RemoteFeedLoader, ReqwestHttpClient,
};
