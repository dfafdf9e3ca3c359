//! Lesson partitioning.
//!
//! The word list is cut into consecutive lessons of `words_per_lesson`
//! entries. Lesson `n` covers word ids `(n - 1) * wpl + 1 ..= n * wpl`; the
//! last lesson may be shorter.

use super::models::{div_ceil, Lesson};
use crate::storage::StorageError;

pub fn validate_lesson_size(words_per_lesson: i64) -> Result<(), StorageError> {
    if words_per_lesson < 1 {
        return Err(StorageError::InvalidInput(
            "wordsPerLesson must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_lesson_number(lesson_number: i64) -> Result<(), StorageError> {
    if lesson_number < 1 {
        return Err(StorageError::InvalidInput(
            "lessonNumber must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Split `total_words` into lessons.
pub fn partition(total_words: i64, words_per_lesson: i64) -> Vec<Lesson> {
    let total_lessons = div_ceil(total_words, words_per_lesson);

    (1..=total_lessons)
        .map(|lesson_number| {
            let start_word = (lesson_number - 1) * words_per_lesson + 1;
            let end_word = lesson_number.saturating_mul(words_per_lesson).min(total_words);
            Lesson {
                lesson_number,
                start_word,
                end_word,
                word_count: end_word - start_word + 1,
            }
        })
        .collect()
}

/// Inclusive word-id range covered by a lesson, or `None` when the lesson
/// starts past the largest possible id.
pub fn id_range(lesson_number: i64, words_per_lesson: i64) -> Option<(i64, i64)> {
    let start = (lesson_number - 1)
        .checked_mul(words_per_lesson)?
        .checked_add(1)?;
    let end = lesson_number.saturating_mul(words_per_lesson);
    Some((start, end))
}
