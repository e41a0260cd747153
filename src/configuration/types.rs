use crate::error_handling::ConfigError;
use serde::Deserialize;

/// Persistent backend a [`Config`](super::config::Config) selects.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Database,
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::File
    }
}

impl StorageBackend {
    /// Parses a backend name as it appears in `FEEDCACHE_BACKEND` or a
    /// configuration file. Matching is case-insensitive.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "database" => Ok(StorageBackend::Database),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_recognizes_both_backends() {
        assert_eq!(StorageBackend::from_name("file").unwrap(), StorageBackend::File);
        assert_eq!(
            StorageBackend::from_name("database").unwrap(),
            StorageBackend::Database
        );
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(
            StorageBackend::from_name("Database").unwrap(),
            StorageBackend::Database
        );
    }

    #[test]
    fn test_from_name_rejects_unknown_backends() {
        let err = StorageBackend::from_name("redis").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(name) if name == "redis"));
    }
}
