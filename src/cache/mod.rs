//! Cache layer for persisting and validating the feed
//!
//! This module contains the `FeedStore` contract and its two reference
//! implementations, the pure freshness policy, and the `LocalFeedCache`
//! coordinator that owns every store mutation. The coordinator replaces the
//! cached snapshot with a delete-then-insert transaction and treats an expired
//! snapshot as equivalent to an empty cache rather than as an error.

mod coordinator;
mod file;
mod memory;
pub(crate) mod policy;
mod store;

pub use coordinator::{Clock, LocalFeedCache, SaveError};
pub use file::FileFeedStore;
pub use memory::InMemoryFeedStore;
pub use store::{CachedFeed, FeedStore, LocalFeedItem, StoreError};
