//! Cache-writing decorators.
//!
//! Each decorator wraps a loader and, when it succeeds, writes the loaded
//! value into a cache from a detached task. The wrapped loader's result is
//! forwarded unchanged and undelayed; a failed cache write is logged at
//! `warn!` and discarded, it can never surface to the caller.

use std::sync::Arc;

use log::warn;
use url::Url;

use crate::error_handling::FeedError;
use crate::feed::{FeedCache, FeedItem, FeedLoader};
use crate::image::task::ImageLoadTask;
use crate::image::{ImageDataCache, ImageDataLoader};

/// Decorates a `FeedLoader` with a write-through into a `FeedCache`.
pub struct FeedLoaderCacheDecorator {
    decoratee: Arc<dyn FeedLoader>,
    cache: Arc<dyn FeedCache>,
}

impl FeedLoaderCacheDecorator {
    pub fn new(decoratee: Arc<dyn FeedLoader>, cache: Arc<dyn FeedCache>) -> Self {
        Self { decoratee, cache }
    }
}

#[async_trait::async_trait]
impl FeedLoader for FeedLoaderCacheDecorator {
    async fn load(&self) -> Result<Vec<FeedItem>, FeedError> {
        let items = self.decoratee.load().await?;
        let cache = Arc::clone(&self.cache);
        let to_cache = items.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.save(to_cache).await {
                warn!("Discarding feed write-through failure: {}", e);
            }
        });
        Ok(items)
    }
}

/// Decorates an `ImageDataLoader` with a write-through into an `ImageDataCache`.
pub struct ImageDataLoaderCacheDecorator {
    decoratee: Arc<dyn ImageDataLoader>,
    cache: Arc<dyn ImageDataCache>,
    // Write-throughs are skipped once the decorator is gone; forwarding the
    // decoratee's result to the caller is not.
    alive: Arc<()>,
}

impl ImageDataLoaderCacheDecorator {
    pub fn new(decoratee: Arc<dyn ImageDataLoader>, cache: Arc<dyn ImageDataCache>) -> Self {
        Self {
            decoratee,
            cache,
            alive: Arc::new(()),
        }
    }
}

impl ImageDataLoader for ImageDataLoaderCacheDecorator {
    fn load_image_data(&self, url: &Url) -> ImageLoadTask {
        let (task, delivery) = ImageLoadTask::pending();
        let inner = self.decoratee.load_image_data(url);
        delivery.state().adopt_inner(inner.cancel_state());

        let cache = Arc::clone(&self.cache);
        let alive = Arc::downgrade(&self.alive);
        let url = url.clone();
        tokio::spawn(async move {
            let Some(result) = inner.outcome().await else {
                // Suppressed upstream; nothing to forward or cache.
                return;
            };
            if let Ok(data) = &result {
                if alive.upgrade().is_some() {
                    let cache = Arc::clone(&cache);
                    let data = data.clone();
                    let url = url.clone();
                    tokio::spawn(async move {
                        if let Err(e) = cache.save_image_data(data, &url).await {
                            warn!("Discarding image write-through failure for {}: {}", url, e);
                        }
                    });
                }
            }
            delivery.deliver(result);
        });

        task
    }
}
