pub mod cache_decorator;
pub mod fallback;

pub use cache_decorator::{FeedLoaderCacheDecorator, ImageDataLoaderCacheDecorator};
pub use fallback::{FeedLoaderWithFallback, ImageDataLoaderWithFallback};
