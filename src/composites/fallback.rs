//! Primary/fallback loader composites.
//!
//! Each composite tries its primary loader first and consults the fallback
//! only after the primary has failed. When both fail, the fallback's error is
//! the one the caller sees, so a total failure stays visible instead of
//! collapsing into an empty success.

use std::sync::Arc;

use log::warn;
use url::Url;

use crate::error_handling::FeedError;
use crate::feed::{FeedItem, FeedLoader};
use crate::image::task::ImageLoadTask;
use crate::image::ImageDataLoader;

/// Loads from `primary`, falling back to `fallback` on failure.
pub struct FeedLoaderWithFallback {
    primary: Arc<dyn FeedLoader>,
    fallback: Arc<dyn FeedLoader>,
}

impl FeedLoaderWithFallback {
    pub fn new(primary: Arc<dyn FeedLoader>, fallback: Arc<dyn FeedLoader>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait::async_trait]
impl FeedLoader for FeedLoaderWithFallback {
    async fn load(&self) -> Result<Vec<FeedItem>, FeedError> {
        match self.primary.load().await {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!("Primary feed load failed ({}), trying fallback", e);
                self.fallback.load().await
            }
        }
    }
}

/// Loads image data from `primary`, falling back to `fallback` on failure.
///
/// Cancelling the returned task reaches whichever inner task is active at
/// that moment. A task cancelled while the primary is still running never
/// starts the fallback.
pub struct ImageDataLoaderWithFallback {
    primary: Arc<dyn ImageDataLoader>,
    fallback: Arc<dyn ImageDataLoader>,
    alive: Arc<()>,
}

impl ImageDataLoaderWithFallback {
    pub fn new(primary: Arc<dyn ImageDataLoader>, fallback: Arc<dyn ImageDataLoader>) -> Self {
        Self {
            primary,
            fallback,
            alive: Arc::new(()),
        }
    }
}

impl ImageDataLoader for ImageDataLoaderWithFallback {
    fn load_image_data(&self, url: &Url) -> ImageLoadTask {
        let (task, delivery) = ImageLoadTask::pending();
        let primary_task = self.primary.load_image_data(url);
        delivery.state().adopt_inner(primary_task.cancel_state());

        let fallback = Arc::clone(&self.fallback);
        let alive = Arc::downgrade(&self.alive);
        let url = url.clone();
        tokio::spawn(async move {
            match primary_task.outcome().await {
                // Cancelled or torn down upstream; stay silent.
                None => {}
                Some(Ok(data)) => delivery.deliver(Ok(data)),
                Some(Err(primary_error)) => {
                    if alive.upgrade().is_none() {
                        return;
                    }
                    warn!(
                        "Primary image load for {} failed ({}), trying fallback",
                        url, primary_error
                    );
                    let fallback_task = fallback.load_image_data(&url);
                    delivery.state().adopt_inner(fallback_task.cancel_state());
                    if let Some(result) = fallback_task.outcome().await {
                        delivery.deliver(result);
                    }
                }
            }
        });

        task
    }
}
