use super::types::StorageBackend;
use crate::error_handling::{ConfigError, StoreError};
use crate::storage::{DatabaseStorage, FileStorage, Storage};
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runtime configuration for the cache library.
///
/// Holds the storage directory and the backend to open inside it. A `Config`
/// is built either from a TOML file (`from_file`) or from the environment
/// (`from_env`), validated with `validate`, and turned into a live backend
/// with `open_storage`.
///
/// # Example file
///
/// ```toml
/// storage_path = "/var/lib/feedcache"
/// backend = "database"
/// ```
#[derive(Debug, PartialEq, Clone, Deserialize)]
pub struct Config {
    /// Directory holding the cached feed snapshot and image blobs.
    pub storage_path: PathBuf,

    /// Persistent backend to open. Defaults to the file backend.
    #[serde(default)]
    pub backend: StorageBackend,
}

impl Config {
    /// Reads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let body = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&body).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        Ok(config)
    }

    /// Builds a configuration from `FEEDCACHE_STORAGE_DIR` and
    /// `FEEDCACHE_BACKEND`, falling back to the current directory and the
    /// file backend when unset.
    pub fn from_env() -> Result<Config, ConfigError> {
        let storage_path = match std::env::var("FEEDCACHE_STORAGE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()?,
        };
        let backend = match std::env::var("FEEDCACHE_BACKEND") {
            Ok(name) => StorageBackend::from_name(&name)?,
            Err(_) => StorageBackend::default(),
        };
        Ok(Config {
            storage_path,
            backend,
        })
    }

    /// Checks that the storage path is usable.
    ///
    /// The backends create the leaf directory themselves, so the path is
    /// accepted when it is an existing directory or when its parent exists.
    /// A path pointing at a plain file is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.is_dir() {
            return Ok(());
        }
        if self.storage_path.exists() {
            return Err(ConfigError::DirectoryDoesNotExist(format!(
                "{} is not a directory",
                self.storage_path.display()
            )));
        }
        match self.storage_path.parent() {
            Some(parent) if parent.as_os_str().is_empty() || parent.is_dir() => Ok(()),
            Some(parent) => Err(ConfigError::DirectoryDoesNotExist(
                parent.display().to_string(),
            )),
            None => Ok(()),
        }
    }

    /// Opens the configured backend.
    pub async fn open_storage(&self) -> Result<Arc<dyn Storage>, StoreError> {
        match self.backend {
            StorageBackend::File => {
                info!("Opening file backend at {}", self.storage_path.display());
                Ok(Arc::new(FileStorage::new(&self.storage_path)?))
            }
            StorageBackend::Database => {
                let db_path = self.storage_path.join(DatabaseStorage::DEFAULT_DB_FILE);
                info!("Opening database backend at {}", db_path.display());
                Ok(Arc::new(DatabaseStorage::new_file(db_path).await?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn restore_var(key: &str, value: Option<String>) {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }

    #[test]
    fn test_from_file_parses_a_full_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedcache.toml");
        fs::write(
            &path,
            "storage_path = \"/var/lib/feedcache\"\nbackend = \"database\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(
            config,
            Config {
                storage_path: PathBuf::from("/var/lib/feedcache"),
                backend: StorageBackend::Database,
            }
        );
    }

    #[test]
    fn test_from_file_defaults_the_backend_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedcache.toml");
        fs::write(&path, "storage_path = \"/var/lib/feedcache\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.backend, StorageBackend::File);
    }

    #[test]
    fn test_from_file_reports_a_missing_file_as_io_error() {
        let dir = TempDir::new().unwrap();

        let err = Config::from_file(dir.path().join("absent.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_from_file_reports_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedcache.toml");
        fs::write(&path, "storage_path = [not toml").unwrap();

        let err = Config::from_file(&path).unwrap_err();

        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_both_variables() {
        let prior_dir = std::env::var("FEEDCACHE_STORAGE_DIR").ok();
        let prior_backend = std::env::var("FEEDCACHE_BACKEND").ok();
        std::env::set_var("FEEDCACHE_STORAGE_DIR", "/tmp/feedcache-env");
        std::env::set_var("FEEDCACHE_BACKEND", "database");

        let config = Config::from_env().unwrap();

        restore_var("FEEDCACHE_STORAGE_DIR", prior_dir);
        restore_var("FEEDCACHE_BACKEND", prior_backend);
        assert_eq!(config.storage_path, PathBuf::from("/tmp/feedcache-env"));
        assert_eq!(config.backend, StorageBackend::Database);
    }

    #[test]
    #[serial]
    fn test_from_env_falls_back_to_cwd_and_file_backend() {
        let prior_dir = std::env::var("FEEDCACHE_STORAGE_DIR").ok();
        let prior_backend = std::env::var("FEEDCACHE_BACKEND").ok();
        std::env::remove_var("FEEDCACHE_STORAGE_DIR");
        std::env::remove_var("FEEDCACHE_BACKEND");

        let config = Config::from_env().unwrap();

        restore_var("FEEDCACHE_STORAGE_DIR", prior_dir);
        restore_var("FEEDCACHE_BACKEND", prior_backend);
        assert_eq!(config.storage_path, std::env::current_dir().unwrap());
        assert_eq!(config.backend, StorageBackend::File);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_an_unknown_backend() {
        let prior_backend = std::env::var("FEEDCACHE_BACKEND").ok();
        std::env::set_var("FEEDCACHE_BACKEND", "cloud");

        let result = Config::from_env();

        restore_var("FEEDCACHE_BACKEND", prior_backend);
        assert!(matches!(result, Err(ConfigError::UnknownBackend(_))));
    }

    #[test]
    fn test_validate_accepts_an_existing_directory() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            storage_path: dir.path().to_path_buf(),
            backend: StorageBackend::File,
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_a_creatable_subdirectory() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            storage_path: dir.path().join("cache"),
            backend: StorageBackend::File,
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_a_path_with_a_missing_parent() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            storage_path: dir.path().join("no/such/cache"),
            backend: StorageBackend::File,
        };

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::DirectoryDoesNotExist(_)));
    }

    #[test]
    fn test_validate_rejects_a_plain_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("occupied");
        fs::write(&path, b"not a directory").unwrap();
        let config = Config {
            storage_path: path,
            backend: StorageBackend::File,
        };

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::DirectoryDoesNotExist(_)));
    }

    #[tokio::test]
    async fn test_open_storage_builds_the_file_backend() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            storage_path: dir.path().to_path_buf(),
            backend: StorageBackend::File,
        };

        let storage = config.open_storage().await.unwrap();

        assert_eq!(storage.retrieve().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_open_storage_builds_the_database_backend() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            storage_path: dir.path().to_path_buf(),
            backend: StorageBackend::Database,
        };

        let storage = config.open_storage().await.unwrap();

        assert_eq!(storage.retrieve().await.unwrap(), None);
        assert!(dir.path().join(DatabaseStorage::DEFAULT_DB_FILE).exists());
    }
}
