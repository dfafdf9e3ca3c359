//! SQLite queries for course progress and dashboard aggregates

use chrono::{Duration, Utc};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::models::*;
use crate::storage::{timestamp, timestamp_column, uuid_column, Database, Result};
use crate::study::accuracy_percent;

/// Days of history included in the dashboard activity list
const ACTIVITY_WINDOW_DAYS: i64 = 7;

impl Database {
    pub fn get_progress(&self, user_id: Uuid) -> Result<Option<UserProgress>> {
        let progress = self
            .conn()
            .query_row(
                "SELECT user_id, current_page, total_pages, words_completed, total_words, last_accessed
                 FROM user_progress WHERE user_id = ?1",
                params![user_id.to_string()],
                |row| {
                    Ok(UserProgress {
                        user_id: uuid_column(row, 0)?,
                        current_page: row.get(1)?,
                        total_pages: row.get(2)?,
                        words_completed: row.get(3)?,
                        total_words: row.get(4)?,
                        last_accessed: timestamp_column(row, 5)?,
                    })
                },
            )
            .optional()?;
        Ok(progress)
    }

    /// Stored progress, or the initial values when nothing was saved yet.
    pub fn get_progress_or_initial(&self, user_id: Uuid) -> Result<UserProgress> {
        Ok(self
            .get_progress(user_id)?
            .unwrap_or_else(|| UserProgress::initial(user_id)))
    }

    /// Create or replace the user's progress and stamp `last_accessed`.
    pub fn update_progress(&self, user_id: Uuid, update: &ProgressUpdate) -> Result<UserProgress> {
        update.validate()?;

        let progress = UserProgress {
            user_id,
            current_page: update.current_page,
            total_pages: update.total_pages,
            words_completed: update.words_completed,
            total_words: update.total_words,
            last_accessed: Utc::now(),
        };

        self.conn().execute(
            "INSERT INTO user_progress (user_id, current_page, total_pages, words_completed, total_words, last_accessed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (user_id) DO UPDATE SET
                current_page = excluded.current_page,
                total_pages = excluded.total_pages,
                words_completed = excluded.words_completed,
                total_words = excluded.total_words,
                last_accessed = excluded.last_accessed",
            params![
                user_id.to_string(),
                progress.current_page,
                progress.total_pages,
                progress.words_completed,
                progress.total_words,
                timestamp(&progress.last_accessed),
            ],
        )?;

        Ok(progress)
    }

    pub fn word_stats(&self, user_id: Uuid) -> Result<WordStats> {
        let stats = self.conn().query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN known = 1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN known = 0 THEN 1 ELSE 0 END), 0)
             FROM user_word_progress WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| {
                Ok(WordStats {
                    total_answered: row.get(0)?,
                    known_words: row.get(1)?,
                    unknown_words: row.get(2)?,
                })
            },
        )?;
        Ok(stats)
    }

    pub fn lesson_completion(&self, user_id: Uuid) -> Result<Vec<LessonCompletion>> {
        let mut stmt = self.conn().prepare(
            "SELECT lesson_number, COUNT(*), COALESCE(SUM(CASE WHEN known = 1 THEN 1 ELSE 0 END), 0)
             FROM user_word_progress WHERE user_id = ?1
             GROUP BY lesson_number
             ORDER BY lesson_number ASC",
        )?;
        let lessons = stmt
            .query_map(params![user_id.to_string()], |row| {
                Ok(LessonCompletion {
                    lesson_number: row.get(0)?,
                    total_words: row.get(1)?,
                    known_words: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lessons)
    }

    /// Words first answered per day over the last week, newest day first.
    pub fn recent_activity(&self, user_id: Uuid) -> Result<Vec<DailyActivity>> {
        let cutoff = (Utc::now().date_naive() - Duration::days(ACTIVITY_WINDOW_DAYS)).to_string();

        let mut stmt = self.conn().prepare(
            "SELECT date(created_at) AS day, COUNT(*)
             FROM user_word_progress
             WHERE user_id = ?1 AND date(created_at) >= ?2
             GROUP BY day
             ORDER BY day DESC",
        )?;
        let activity = stmt
            .query_map(params![user_id.to_string(), cutoff], |row| {
                Ok(DailyActivity {
                    date: row.get(0)?,
                    words_learned: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(activity)
    }

    pub fn dashboard_stats(&self, user_id: Uuid) -> Result<DashboardStats> {
        let word_stats = self.word_stats(user_id)?;
        let accuracy = accuracy_percent(word_stats.known_words, word_stats.total_answered);

        Ok(DashboardStats {
            progress: self.get_progress_or_initial(user_id)?,
            lesson_stats: self.lesson_completion(user_id)?,
            recent_activity: self.recent_activity(user_id)?,
            word_stats,
            accuracy,
        })
    }
}
