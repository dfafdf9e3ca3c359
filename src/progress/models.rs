//! Data models for course progress and the dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::StorageError;

/// Where a user is in the word list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: Uuid,
    pub current_page: i64,
    pub total_pages: i64,
    pub words_completed: i64,
    pub total_words: i64,
    pub last_accessed: DateTime<Utc>,
}

impl UserProgress {
    /// Progress reported for a user who has never saved any
    pub fn initial(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_page: 1,
            total_pages: 1,
            words_completed: 0,
            total_words: 0,
            last_accessed: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub current_page: i64,
    pub total_pages: i64,
    pub words_completed: i64,
    pub total_words: i64,
}

impl ProgressUpdate {
    pub fn validate(&self) -> Result<(), StorageError> {
        let checks = [
            ("currentPage", self.current_page, 1),
            ("totalPages", self.total_pages, 1),
            ("wordsCompleted", self.words_completed, 0),
            ("totalWords", self.total_words, 0),
        ];
        for (field, value, min) in checks {
            if value < min {
                return Err(StorageError::InvalidInput(format!(
                    "{} must be at least {}",
                    field, min
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStats {
    pub total_answered: i64,
    pub known_words: i64,
    pub unknown_words: i64,
}

/// Answers recorded for one lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonCompletion {
    pub lesson_number: i64,
    pub total_words: i64,
    pub known_words: i64,
}

/// Words first answered on a given day (`YYYY-MM-DD`, UTC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: String,
    pub words_learned: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub progress: UserProgress,
    pub word_stats: WordStats,
    pub lesson_stats: Vec<LessonCompletion>,
    pub recent_activity: Vec<DailyActivity>,
    /// Percentage of answered words marked known, rounded
    pub accuracy: i64,
}
