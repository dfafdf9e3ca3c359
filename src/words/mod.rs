//! Word list browsing, lesson partitioning and per-word answers
//!
//! This module provides:
//! - Paginated, searchable, sortable word listing
//! - Lesson partitioning of the word list
//! - Known/unknown answers per user and word, with lesson statistics

pub mod lessons;
pub mod models;
mod storage;

pub use models::*;
