use std::path::Path;

use anyhow::{Context, Result};

use salita_lib::{Database, ServerConfig};

/// Shared application state for CLI commands
pub struct App {
    pub config: ServerConfig,
    pub db: Database,
}

impl App {
    /// Load configuration and open the database it points at
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(config_path)?;
        let db = Database::open(&config.database_path).with_context(|| {
            format!("Failed to open database at {:?}", config.database_path)
        })?;

        Ok(Self { config, db })
    }
}

pub fn load_config(config_path: Option<&Path>) -> Result<ServerConfig> {
    ServerConfig::load(config_path).context("Failed to load configuration")
}
