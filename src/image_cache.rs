pub mod local_loader;

pub use local_loader::LocalImageDataLoader;
