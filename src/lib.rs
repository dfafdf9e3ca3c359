//! Salita: a vocabulary study service.
//!
//! Users register and sign in, browse a searchable word list, study it in
//! fixed-size lessons with flashcards or swipe cards, and track progress.
//! Everything is stored in one SQLite database and served as JSON by an
//! axum HTTP server.

pub mod auth;
pub mod config;
pub mod import;
pub mod progress;
pub mod server;
pub mod storage;
pub mod study;
pub mod words;

pub use config::ServerConfig;
pub use server::{router, serve, AppState};
pub use storage::Database;
