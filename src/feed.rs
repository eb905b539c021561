//! Core domain model for feed items
//!
//! A `FeedItem` is a single entry of the remote feed as the rest of the
//! application sees it, independent of both the wire format and the cache
//! encoding.

use uuid::Uuid;

/// A single feed entry
///
/// Equality is structural: two items are equal when all four fields match.
/// Ordering of items is meaningful only at the containing-sequence level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Unique identifier for the item
    pub id: Uuid,
    /// Optional descriptive text
    pub description: Option<String>,
    /// Optional location text
    pub location: Option<String>,
    /// URL of the item's image
    pub image_url: String,
}

impl FeedItem {
    /// Creates a new FeedItem
    pub fn new(
        id: Uuid,
        description: Option<String>,
        location: Option<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            description,
            location,
            image_url: image_url.into(),
        }
    }
}
