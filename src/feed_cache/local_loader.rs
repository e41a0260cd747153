//! Cache-backed feed loading, saving and validation.
//!
//! `LocalFeedLoader` is the cache use-case layer: it owns no persistence
//! itself, it drives an injected [`Storage`] backend and applies the
//! freshness policy to whatever that backend returns.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use crate::error_handling::FeedError;
use crate::feed::{FeedCache, FeedItem, FeedLoader};
use crate::feed_cache::policy::CachePolicy;
use crate::storage::Storage;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Feed loader and cache backed by a [`Storage`] instance.
///
/// Time is injected so staleness is deterministic under test; production
/// code uses [`LocalFeedLoader::new`], which reads the wall clock.
pub struct LocalFeedLoader {
    store: Arc<dyn Storage>,
    clock: Clock,
}

impl LocalFeedLoader {
    /// Creates a loader stamping and validating snapshots with the wall clock.
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self::new_with_clock(store, Arc::new(Utc::now))
    }

    /// Creates a loader with an injected time source.
    pub fn new_with_clock(store: Arc<dyn Storage>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Deletes the cache when it is unreadable or stale.
    ///
    /// An unreadable or expired snapshot is removed and the deletion's
    /// outcome reported; an empty or fresh cache is left alone. Unlike
    /// `load`, which never mutates, this is the self-healing entry point
    /// applications call on startup or resume.
    pub async fn validate_cache(&self) -> Result<(), FeedError> {
        match self.store.retrieve().await {
            Err(e) => {
                debug!("Cache unreadable ({}), deleting", e);
                self.store.delete_cached_feed().await.map_err(FeedError::Store)
            }
            Ok(Some(snapshot)) if !CachePolicy::validate(snapshot.timestamp, (self.clock)()) => {
                debug!("Cache stale, deleting");
                self.store.delete_cached_feed().await.map_err(FeedError::Store)
            }
            Ok(_) => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl FeedLoader for LocalFeedLoader {
    /// Loads the cached feed.
    ///
    /// A store failure surfaces unchanged; an empty or stale cache is an
    /// empty success, never an error; a fresh cache yields its items.
    /// Loading never mutates the cache, stale or not.
    async fn load(&self) -> Result<Vec<FeedItem>, FeedError> {
        match self.store.retrieve().await.map_err(FeedError::Store)? {
            Some(snapshot) if CachePolicy::validate(snapshot.timestamp, (self.clock)()) => {
                debug!("Cache hit with {} item(s)", snapshot.items.len());
                Ok(snapshot.items)
            }
            Some(_) => {
                debug!("Cache stale, serving empty feed");
                Ok(Vec::new())
            }
            None => {
                debug!("Cache empty");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait::async_trait]
impl FeedCache for LocalFeedLoader {
    /// Replaces the cached feed with `items`, stamped with the current time.
    ///
    /// Deletion of the old snapshot comes first; if it fails, no insertion
    /// is attempted and the deletion error surfaces. If the insertion fails
    /// after a successful deletion the cache is left empty — there is no
    /// rollback, the next successful save or validation settles the state.
    async fn save(&self, items: Vec<FeedItem>) -> Result<(), FeedError> {
        self.store.delete_cached_feed().await.map_err(FeedError::Store)?;
        self.store
            .insert(&items, (self.clock)())
            .await
            .map_err(FeedError::Store)?;
        debug!("Saved feed snapshot with {} item(s)", items.len());
        Ok(())
    }
}
