//! Study-session helpers shared by the flashcard and swipe modes

pub mod swipe;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Database, Result};
use crate::words::{LessonStats, WordProgressInput};

pub use swipe::{SwipeDirection, SwipeOutcome, SwipeRequest, SWIPE_THRESHOLD};

/// Share of `known` in `total` as a rounded percentage; 0 when nothing was answered.
pub fn accuracy_percent(known: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (known as f64 / total as f64 * 100.0).round() as i64
}

/// End-of-lesson numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub lesson_number: i64,
    pub total: i64,
    pub known: i64,
    pub unknown: i64,
    pub accuracy: i64,
    /// Lesson to offer next, if the word list has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_lesson: Option<i64>,
}

impl LessonSummary {
    pub fn new(lesson_number: i64, stats: &LessonStats, total_lessons: i64) -> Self {
        Self {
            lesson_number,
            total: stats.total,
            known: stats.known,
            unknown: stats.unknown,
            accuracy: accuracy_percent(stats.known, stats.total),
            next_lesson: (lesson_number < total_lessons).then_some(lesson_number + 1),
        }
    }
}

impl Database {
    /// Turn a released drag into an answer for `word_id`, if it was a swipe.
    pub fn record_swipe(
        &self,
        user_id: Uuid,
        lesson_number: i64,
        request: &SwipeRequest,
    ) -> Result<SwipeOutcome> {
        let Some(direction) = SwipeDirection::from_offset(request.offset_x, SWIPE_THRESHOLD) else {
            return Ok(SwipeOutcome {
                recorded: false,
                direction: None,
                known: None,
            });
        };

        let known = direction.known();
        self.save_word_progress(
            user_id,
            &WordProgressInput {
                word_id: request.word_id,
                known,
                lesson_number,
            },
        )?;

        Ok(SwipeOutcome {
            recorded: true,
            direction: Some(direction),
            known: Some(known),
        })
    }

    pub fn lesson_summary(
        &self,
        user_id: Uuid,
        lesson_number: i64,
        words_per_lesson: i64,
    ) -> Result<LessonSummary> {
        let stats = self.get_lesson_stats(user_id, lesson_number)?;
        let total_lessons = self.get_lessons(words_per_lesson)?.lessons.len() as i64;
        Ok(LessonSummary::new(lesson_number, &stats, total_lessons))
    }
}
