//! Server configuration.
//!
//! Read from a TOML file when one is given or found in the data directory,
//! then overridden by `SALITA_*` environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "salita.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Word list used by the import
    pub words_csv_path: PathBuf,
    /// Prefix for word and sentence audio files
    pub audio_base_url: String,
    /// Lifetime of a login session
    pub session_ttl_hours: i64,
    /// Lesson size used when a request does not specify one
    pub words_per_lesson: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let database_path = Self::default_data_dir()
            .map(|dir| dir.join(DATABASE_FILE))
            .unwrap_or_else(|_| PathBuf::from(DATABASE_FILE));

        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            database_path,
            words_csv_path: PathBuf::from("public/word2000.csv"),
            audio_base_url: "/audio".to_string(),
            session_ttl_hours: 24 * 30,
            words_per_lesson: 20,
        }
    }
}

impl ServerConfig {
    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("salita"))
            .ok_or(ConfigError::DataDirNotFound)
    }

    /// Load configuration from `path`, or from the data directory when no
    /// path is given. A missing default file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_data_dir()?.join(CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    log::info!("No config file at {:?}, using defaults", default_path);
                    Self::default()
                }
            }
        };

        Ok(config.apply_env())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply `SALITA_BIND`, `SALITA_DB` and `SALITA_AUDIO_URL` overrides.
    pub fn apply_env(mut self) -> Self {
        if let Ok(bind) = env::var("SALITA_BIND") {
            self.bind_address = bind;
        }
        if let Ok(db) = env::var("SALITA_DB") {
            self.database_path = PathBuf::from(db);
        }
        if let Ok(url) = env::var("SALITA_AUDIO_URL") {
            self.audio_base_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "bind_address = \"0.0.0.0:8080\"\nwords_per_lesson = 10\n",
        )
        .unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.words_per_lesson, 10);
        assert_eq!(config.audio_base_url, "/audio");
        assert_eq!(config.session_ttl_hours, 720);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "words_per_lesson = \"many\"").unwrap();

        assert!(matches!(
            ServerConfig::from_file(&path),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = ServerConfig::load(Some(&temp.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
