//! Data models for the word list, lessons and per-word answers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

/// Largest page size a caller may request
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A vocabulary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i64,
    /// Position in the source word list
    pub no: i64,
    pub tagalog: String,
    pub english: String,
    pub example: String,
    /// English translation of `example`
    pub translation: String,
    pub chunk: String,
    pub audio1: Option<String>,
    pub audio2: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioLinks>,
}

impl Word {
    pub fn attach_audio(&mut self, base_url: &str) {
        self.audio = Some(AudioLinks::for_number(self.no, base_url));
    }
}

/// Recorded pronunciations for a word and its example sentence.
///
/// Files are named `row_NNNN_word.mp3` / `row_NNNN_sentence.mp3`, where
/// `NNNN` is the word's list number zero-padded to four digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioLinks {
    pub word: String,
    pub sentence: String,
}

impl AudioLinks {
    pub fn for_number(no: i64, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            word: format!("{}/row_{:04}_word.mp3", base, no),
            sentence: format!("{}/row_{:04}_sentence.mp3", base, no),
        }
    }
}

/// A word ready to be inserted; `id` and `created_at` are assigned on insert
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewWord {
    pub no: i64,
    pub tagalog: String,
    pub english: String,
    pub example: String,
    pub translation: String,
    pub chunk: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordOrder {
    #[default]
    Id,
    No,
    Tagalog,
    English,
    CreatedAt,
}

impl WordOrder {
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::No => "no",
            Self::Tagalog => "tagalog",
            Self::English => "english",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Parameters for listing words
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub order_by: WordOrder,
    #[serde(default)]
    pub order_direction: SortDirection,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl Default for WordQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            order_by: WordOrder::default(),
            order_direction: SortDirection::default(),
        }
    }
}

impl WordQuery {
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.page < 1 {
            return Err(StorageError::InvalidInput("page must be at least 1".to_string()));
        }
        if self.limit < 1 || self.limit > MAX_PAGE_LIMIT {
            return Err(StorageError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
        if (self.page - 1).checked_mul(self.limit).is_none() {
            return Err(StorageError::InvalidInput("page is out of range".to_string()));
        }
        Ok(())
    }

    /// The search term, if it has any non-whitespace content.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: div_ceil(total, limit),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPage {
    pub words: Vec<Word>,
    pub pagination: Pagination,
}

/// A contiguous slice of the word list studied as one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub lesson_number: i64,
    pub start_word: i64,
    pub end_word: i64,
    pub word_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonList {
    pub lessons: Vec<Lesson>,
    pub total_words: i64,
}

/// One known/unknown answer for a word
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgressInput {
    pub word_id: i64,
    pub known: bool,
    pub lesson_number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonStats {
    pub total: i64,
    pub known: i64,
    pub unknown: i64,
}

pub(crate) fn div_ceil(total: i64, per: i64) -> i64 {
    if per <= 0 {
        return 0;
    }
    total / per + i64::from(total % per != 0)
}
