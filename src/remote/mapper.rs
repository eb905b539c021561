//! Wire-payload mapping
//!
//! Decodes the remote feed payload into domain records. Only a 200 response
//! with a body matching the expected schema is accepted; everything else is a
//! single invalid-data outcome, never a partial parse.

use serde::Deserialize;
use uuid::Uuid;

use super::loader::RemoteError;
use crate::feed::FeedItem;

const OK_200: u16 = 200;

/// Top-level wire payload: `{"items": [...]}`
#[derive(Debug, Deserialize)]
struct Root {
    items: Vec<RemoteFeedItem>,
}

/// A single feed entry as it appears on the wire
#[derive(Debug, Deserialize)]
struct RemoteFeedItem {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    image: String,
}

impl From<RemoteFeedItem> for FeedItem {
    fn from(item: RemoteFeedItem) -> Self {
        Self {
            id: item.id,
            description: item.description,
            location: item.location,
            image_url: item.image,
        }
    }
}

/// Maps a raw response to feed items
///
/// Decode detail is deliberately collapsed into `RemoteError::InvalidData` to
/// keep the domain-facing error surface small and stable.
pub(super) fn map(body: &[u8], status: u16) -> Result<Vec<FeedItem>, RemoteError> {
    if status != OK_200 {
        return Err(RemoteError::InvalidData);
    }

    let root: Root = serde_json::from_slice(body).map_err(|_| RemoteError::InvalidData)?;
    Ok(root.items.into_iter().map(FeedItem::from).collect())
}
