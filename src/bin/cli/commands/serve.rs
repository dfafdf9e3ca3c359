use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::app::load_config;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    log::info!("Using database {:?}", config.database_path);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(salita_lib::serve(config))
        .map_err(|e| anyhow!(e))
}
