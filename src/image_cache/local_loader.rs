//! Cache-backed image data loading and saving.

use std::sync::Arc;

use log::{debug, error};
use url::Url;

use crate::error_handling::ImageError;
use crate::image::task::ImageLoadTask;
use crate::image::{ImageDataCache, ImageDataLoader};
use crate::storage::Storage;

/// Image data loader and cache backed by a [`Storage`] instance.
///
/// Store failures are deliberately flattened into [`ImageError::SaveFailed`]
/// and [`ImageError::LoadFailed`]; callers composing loaders should not have
/// to care which backend sat underneath.
pub struct LocalImageDataLoader {
    store: Arc<dyn Storage>,
    // Detached workers hold a Weak to this token. Once the loader is gone
    // they finish their store access but stop short of delivering.
    alive: Arc<()>,
}

impl LocalImageDataLoader {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self {
            store,
            alive: Arc::new(()),
        }
    }
}

impl ImageDataLoader for LocalImageDataLoader {
    /// Starts retrieving the payload cached for `url`.
    ///
    /// Resolves to `NotFound` when the store holds nothing for the URL and
    /// to `LoadFailed` on any store error. Cancelling the returned task (or
    /// dropping this loader) suppresses delivery; the store retrieval itself
    /// always runs to completion.
    fn load_image_data(&self, url: &Url) -> ImageLoadTask {
        let (task, delivery) = ImageLoadTask::pending();
        let store = Arc::clone(&self.store);
        let alive = Arc::downgrade(&self.alive);
        let url = url.clone();

        tokio::spawn(async move {
            let outcome = store.retrieve_image_data(&url).await;
            if alive.upgrade().is_none() {
                debug!("Loader gone before image result for {} was ready, dropping it", url);
                return;
            }
            let result = match outcome {
                Ok(Some(data)) => Ok(data),
                Ok(None) => Err(ImageError::NotFound),
                Err(e) => { error!("Image load failed for {}: {}", url, e); Err(ImageError::LoadFailed) }
            };
            delivery.deliver(result);
        });

        task
    }
}

#[async_trait::async_trait]
impl ImageDataCache for LocalImageDataLoader {
    /// Stores `data` for `url`, reporting any store failure as `SaveFailed`.
    async fn save_image_data(&self, data: Vec<u8>, url: &Url) -> Result<(), ImageError> {
        self.store
            .insert_image_data(url, &data)
            .await
            .map_err(|e| { error!("Image save failed for {}: {}", url, e); ImageError::SaveFailed })
    }
}
