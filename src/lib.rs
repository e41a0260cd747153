pub mod composites;
pub mod configuration;
pub mod error_handling;
pub mod feed;
pub mod feed_cache;
pub mod image;
pub mod image_cache;
pub mod storage;

pub use composites::{
    FeedLoaderCacheDecorator, FeedLoaderWithFallback, ImageDataLoaderCacheDecorator,
    ImageDataLoaderWithFallback,
};
pub use configuration::{Config, StorageBackend};
pub use error_handling::{ConfigError, FeedError, ImageError, StoreError};
pub use feed::{FeedCache, FeedItem, FeedLoader, FeedSnapshot};
pub use feed_cache::{CachePolicy, LocalFeedLoader};
pub use image::{ImageDataCache, ImageDataLoader, ImageLoadResult, ImageLoadTask};
pub use image_cache::LocalImageDataLoader;
pub use storage::{DatabaseStorage, FileStorage, Storage};
