//! Per-user course progress and dashboard statistics

pub mod models;
mod storage;

pub use models::*;
