use crate::error_handling::FeedError;
use crate::feed::FeedItem;

/// The `FeedLoader` trait is the read side of the feed pipeline.
///
/// Remote adapters, cache-backed loaders and their compositions all present
/// this same surface, so callers never know which concrete source produced
/// the items.
#[async_trait::async_trait]
pub trait FeedLoader: Send + Sync {
    /// Loads the current feed from this source.
    async fn load(&self) -> Result<Vec<FeedItem>, FeedError>;
}

/// The `FeedCache` trait is the write side of the feed pipeline.
#[async_trait::async_trait]
pub trait FeedCache: Send + Sync {
    /// Replaces the cached feed with `items`, stamped with the current time.
    async fn save(&self, items: Vec<FeedItem>) -> Result<(), FeedError>;
}
