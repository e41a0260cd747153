pub mod types;

pub use types::{ConfigError, FeedError, ImageError, StoreError};
