use std::path::Path;

use anyhow::{Context, Result};

use salita_lib::import;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, csv: Option<&Path>, format: &OutputFormat) -> Result<()> {
    let path = csv
        .map(Path::to_path_buf)
        .unwrap_or_else(|| app.config.words_csv_path.clone());

    let report = import::import_words(&mut app.db, &path)
        .with_context(|| format!("Failed to import words from {:?}", path))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            println!("Successfully inserted {} words", report.inserted_count);
        }
    }

    Ok(())
}
