//! Remote feed loader
//!
//! Fetches the feed URL through an `HttpClient` and maps the payload into
//! domain records.

use super::client::HttpClient;
use super::mapper;
use crate::feed::FeedItem;

/// Errors surfaced by a remote load
///
/// `Connectivity` covers transport-level failures and may be worth retrying by
/// the caller; `InvalidData` covers everything the remote actually returned
/// that failed validation, which retrying will not fix. This layer retries
/// neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The remote source could not be reached
    #[error("could not reach the remote feed")]
    Connectivity,

    /// The remote source answered with an unexpected status or payload
    #[error("remote feed returned invalid data")]
    InvalidData,
}

/// Loads the feed from a remote URL
#[derive(Debug, Clone)]
pub struct RemoteFeedLoader<C> {
    url: String,
    client: C,
}

impl<C: HttpClient> RemoteFeedLoader<C> {
    /// Creates a loader fetching `url` through `client`
    pub fn new(url: impl Into<String>, client: C) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// Fetches and decodes the remote feed
    pub async fn load(&self) -> Result<Vec<FeedItem>, RemoteError> {
        match self.client.get(&self.url).await {
            Ok(response) => mapper::map(&response.body, response.status),
            Err(_) => Err(RemoteError::Connectivity),
        }
    }
}
