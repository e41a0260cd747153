use url::Url;

use crate::error_handling::ImageError;
use crate::image::task::ImageLoadTask;

/// The read side of the image pipeline.
///
/// `load_image_data` starts the work and returns immediately; callers await
/// the returned task for the result and may cancel it at any point. Must be
/// called from within a Tokio runtime, since implementations spawn the
/// actual retrieval onto it.
pub trait ImageDataLoader: Send + Sync {
    /// Starts loading the image payload stored at `url`.
    fn load_image_data(&self, url: &Url) -> ImageLoadTask;
}

/// The write side of the image pipeline.
#[async_trait::async_trait]
pub trait ImageDataCache: Send + Sync {
    /// Stores `data` as the cached payload for `url`, replacing any previous one.
    async fn save_image_data(&self, data: Vec<u8>, url: &Url) -> Result<(), ImageError>;
}
