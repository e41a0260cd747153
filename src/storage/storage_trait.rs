//! Storage Trait
//!
//! This module defines the `Storage` trait, which provides an interface for feed
//! snapshot and image data storage backends.
//!
//! Implementors of this trait are responsible for:
//! - Persisting and retrieving the single cached feed snapshot
//! - Persisting and retrieving image payloads keyed by URL
//! - Replacing the snapshot atomically, never leaving a torn state behind
//! - Applying operations issued against one instance in their issue order
//!   (reads may run concurrently; mutations are serialized)
//!
//! All methods return a `Result` to handle potential storage errors.

use chrono::{DateTime, Utc};
use url::Url;

use crate::error_handling::types::StoreError;
use crate::feed::{FeedItem, FeedSnapshot};

/// The `Storage` trait defines the interface for feed cache storage backends.
///
/// A backend holds at most one feed snapshot plus an independent set of image
/// payloads keyed by URL. Both shipped backends (file and database) honor the
/// same contract and are interchangeable behind `Arc<dyn Storage>`.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Removes the cached feed snapshot. Succeeds as a no-op when none exists.
    async fn delete_cached_feed(&self) -> Result<(), StoreError>;

    /// Replaces the cached snapshot wholesale with `items` stamped `timestamp`.
    async fn insert(&self, items: &[FeedItem], timestamp: DateTime<Utc>) -> Result<(), StoreError>;

    /// Retrieves the cached snapshot, or `None` when the cache is empty.
    async fn retrieve(&self) -> Result<Option<FeedSnapshot>, StoreError>;

    /// Retrieves the image payload cached for `url`, if any.
    async fn retrieve_image_data(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `data` as the image payload for `url`, replacing any previous one.
    async fn insert_image_data(&self, url: &Url, data: &[u8]) -> Result<(), StoreError>;
}
