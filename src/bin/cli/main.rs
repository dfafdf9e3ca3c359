mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "salita", about = "Vocabulary study server and admin tools", version)]
struct Cli {
    /// Path to a config.toml (default: <data dir>/salita/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server
    Serve,

    /// Import the word list from CSV
    ImportWords {
        /// CSV file (defaults to the configured word list)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Create a user account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Show how the word list is split into lessons
    Lessons {
        /// Words per lesson (defaults to the configured size)
        #[arg(long)]
        words_per_lesson: Option<i64>,
    },

    /// Show a user's dashboard statistics
    Stats {
        /// Email of the user
        #[arg(long)]
        email: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Serve => {
            commands::serve::run(config_path)?;
        }
        Command::ImportWords { csv } => {
            let mut app = app::App::new(config_path)?;
            commands::import::run(&mut app, csv.as_deref(), &cli.format)?;
        }
        Command::Register { name, email, password } => {
            let app = app::App::new(config_path)?;
            commands::register::run(&app, name, email, password, &cli.format)?;
        }
        Command::Lessons { words_per_lesson } => {
            let app = app::App::new(config_path)?;
            commands::lessons::run(&app, words_per_lesson, &cli.format)?;
        }
        Command::Stats { email } => {
            let app = app::App::new(config_path)?;
            commands::stats::run(&app, &email, &cli.format)?;
        }
    }

    Ok(())
}
