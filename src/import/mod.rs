//! Word list import from CSV
//!
//! Expected columns, after a header row:
//! `no, tagalog, english, example, translation`
//!
//! Blank lines are skipped, fields are trimmed and one layer of surrounding
//! quotes is dropped. Rows without both a Tagalog and an English entry are
//! ignored. When `no` is missing, zero or not a number, the 1-based data-row
//! index is used instead.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{Database, StorageError};
use crate::words::NewWord;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Word list not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub inserted_count: usize,
}

/// Parse word rows from CSV text.
pub fn parse_words<R: Read>(reader: R) -> Result<Vec<NewWord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut words = Vec::new();
    let mut index: usize = 0;
    for record in reader.records() {
        let record = record?;
        // Whitespace-only lines are blank, not data rows
        if record.iter().all(str::is_empty) {
            continue;
        }
        index += 1;

        let field = |i: usize| strip_quotes(record.get(i).unwrap_or("")).to_string();

        let no = record
            .get(0)
            .and_then(parse_leading_int)
            .filter(|n| *n != 0)
            .unwrap_or(index as i64);

        let word = NewWord {
            no,
            tagalog: field(1),
            english: field(2),
            example: field(3),
            translation: field(4),
            chunk: String::new(),
        };

        if word.tagalog.is_empty() || word.english.is_empty() {
            log::warn!("Skipping word row {}: missing tagalog or english", index);
            continue;
        }
        words.push(word);
    }

    Ok(words)
}

pub fn parse_words_file(path: &Path) -> Result<Vec<NewWord>> {
    if !path.exists() {
        return Err(ImportError::NotFound(path.to_path_buf()));
    }
    parse_words(File::open(path)?)
}

/// Read the CSV at `path` and insert every valid row.
pub fn import_words(db: &mut Database, path: &Path) -> Result<ImportReport> {
    let words = parse_words_file(path)?;
    let inserted_count = db.insert_words(&words)?;

    log::info!("Imported {} words from {:?}", inserted_count, path);
    Ok(ImportReport { inserted_count })
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Integer prefix of `value` ("12abc" -> 12), like a lenient numeric parse.
fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
