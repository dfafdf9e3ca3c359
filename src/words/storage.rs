//! SQLite queries for words and per-user word answers

use chrono::Utc;
use rusqlite::{named_params, params, OptionalExtension, Row};
use uuid::Uuid;

use super::lessons;
use super::models::*;
use crate::storage::{timestamp, timestamp_column, Database, Result, StorageError};

const WORD_COLUMNS: &str =
    "id, no, tagalog, english, example, translation, chunk, audio1, audio2, created_at";

fn word_from_row(row: &Row) -> rusqlite::Result<Word> {
    Ok(Word {
        id: row.get(0)?,
        no: row.get(1)?,
        tagalog: row.get(2)?,
        english: row.get(3)?,
        example: row.get(4)?,
        translation: row.get(5)?,
        chunk: row.get(6)?,
        audio1: row.get(7)?,
        audio2: row.get(8)?,
        created_at: timestamp_column(row, 9)?,
        audio: None,
    })
}

/// Escape LIKE wildcards so user input matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

const SEARCH_FILTER: &str = r"(:pattern IS NULL
    OR tagalog LIKE :pattern ESCAPE '\'
    OR english LIKE :pattern ESCAPE '\'
    OR translation LIKE :pattern ESCAPE '\')";

impl Database {
    /// One page of the word list, optionally filtered and sorted.
    pub fn get_words(&self, query: &WordQuery) -> Result<WordPage> {
        query.validate()?;

        let pattern = query.search_term().map(like_pattern);

        let sql = format!(
            "SELECT {} FROM words WHERE {} ORDER BY {} {}, id ASC LIMIT :limit OFFSET :offset",
            WORD_COLUMNS,
            SEARCH_FILTER,
            query.order_by.column(),
            query.order_direction.sql(),
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let words = stmt
            .query_map(
                named_params! {
                    ":pattern": pattern,
                    ":limit": query.limit,
                    ":offset": query.offset(),
                },
                word_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let total: i64 = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM words WHERE {}", SEARCH_FILTER),
            named_params! { ":pattern": pattern },
            |row| row.get(0),
        )?;

        Ok(WordPage {
            words,
            pagination: Pagination::new(query.page, query.limit, total),
        })
    }

    pub fn get_word_by_id(&self, id: i64) -> Result<Option<Word>> {
        let sql = format!("SELECT {} FROM words WHERE id = ?1", WORD_COLUMNS);
        let word = self
            .conn()
            .query_row(&sql, params![id], word_from_row)
            .optional()?;
        Ok(word)
    }

    pub fn count_words(&self) -> Result<i64> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn get_lessons(&self, words_per_lesson: i64) -> Result<LessonList> {
        lessons::validate_lesson_size(words_per_lesson)?;

        let total_words = self.count_words()?;
        Ok(LessonList {
            lessons: lessons::partition(total_words, words_per_lesson),
            total_words,
        })
    }

    pub fn get_words_by_lesson(&self, lesson_number: i64, words_per_lesson: i64) -> Result<Vec<Word>> {
        lessons::validate_lesson_number(lesson_number)?;
        lessons::validate_lesson_size(words_per_lesson)?;

        let Some((start, end)) = lessons::id_range(lesson_number, words_per_lesson) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {} FROM words WHERE id >= ?1 AND id <= ?2 ORDER BY id ASC",
            WORD_COLUMNS
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let words = stmt
            .query_map(params![start, end], word_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    /// Insert words in a single transaction. Returns the number inserted.
    pub fn insert_words(&mut self, words: &[NewWord]) -> Result<usize> {
        let now = timestamp(&Utc::now());
        let tx = self.conn_mut().transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO words (no, tagalog, english, example, translation, chunk, audio1, audio2, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL, ?7)",
            )?;
            for word in words {
                stmt.execute(params![
                    word.no,
                    word.tagalog,
                    word.english,
                    word.example,
                    word.translation,
                    word.chunk,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        Ok(words.len())
    }

    /// Record whether the user knows a word, replacing any earlier answer.
    pub fn save_word_progress(&self, user_id: Uuid, input: &WordProgressInput) -> Result<()> {
        if self.get_word_by_id(input.word_id)?.is_none() {
            return Err(StorageError::WordNotFound(input.word_id));
        }

        let now = timestamp(&Utc::now());
        self.conn().execute(
            "INSERT INTO user_word_progress (user_id, word_id, known, lesson_number, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT (user_id, word_id) DO UPDATE SET
                known = excluded.known,
                lesson_number = excluded.lesson_number,
                updated_at = excluded.updated_at",
            params![user_id.to_string(), input.word_id, input.known, input.lesson_number, now],
        )?;
        Ok(())
    }

    pub fn get_lesson_stats(&self, user_id: Uuid, lesson_number: i64) -> Result<LessonStats> {
        let (total, known): (i64, i64) = self.conn().query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN known = 1 THEN 1 ELSE 0 END), 0)
             FROM user_word_progress
             WHERE user_id = ?1 AND lesson_number = ?2",
            params![user_id.to_string(), lesson_number],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(LessonStats {
            total,
            known,
            unknown: total - known,
        })
    }
}
