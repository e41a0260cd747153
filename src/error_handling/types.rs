use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    ConnectionFailed,
    ReadFailed,
    WriteFailed,
    DecodeFailed,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ConnectionFailed => write!(f, "Store connection failed"),
            StoreError::ReadFailed => write!(f, "Store read failed"),
            StoreError::WriteFailed => write!(f, "Store write failed"),
            StoreError::DecodeFailed => write!(f, "Stored data could not be decoded"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    Connectivity,
    InvalidData,
    Store(StoreError),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Connectivity => write!(f, "Feed source unreachable"),
            FeedError::InvalidData => write!(f, "Feed payload could not be decoded"),
            FeedError::Store(e) => write!(f, "Feed store error: {}", e),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<StoreError> for FeedError {
    fn from(err: StoreError) -> Self {
        FeedError::Store(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    Connectivity,
    InvalidData,
    SaveFailed,
    LoadFailed,
    NotFound,
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Connectivity => write!(f, "Image source unreachable"),
            ImageError::InvalidData => write!(f, "Image payload could not be decoded"),
            ImageError::SaveFailed => write!(f, "Image data could not be saved"),
            ImageError::LoadFailed => write!(f, "Image data could not be loaded"),
            ImageError::NotFound => write!(f, "No image data cached for this URL"),
        }
    }
}

impl std::error::Error for ImageError {}

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    DirectoryDoesNotExist(String),
    UnknownBackend(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::DirectoryDoesNotExist(e) => write!(f, "Directory error: {}", e),
            ConfigError::UnknownBackend(e) => write!(f, "Unknown storage backend: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}
