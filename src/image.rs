pub mod loader;
pub mod task;

pub use loader::{ImageDataCache, ImageDataLoader};
pub use task::{ImageLoadResult, ImageLoadTask};
