//! Swipe decisions for the card-swiping study mode.
//!
//! A card dragged horizontally past the threshold is answered: right means
//! the word is known, left means it is not. Shorter drags snap back and
//! record nothing.

use serde::{Deserialize, Serialize};

/// Horizontal drag distance, in pixels, needed to answer a card
pub const SWIPE_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Decide a swipe from the horizontal drag offset, if it went far enough.
    pub fn from_offset(offset_x: f64, threshold: f64) -> Option<Self> {
        if !offset_x.is_finite() || offset_x.abs() <= threshold {
            return None;
        }
        if offset_x > 0.0 {
            Some(Self::Right)
        } else {
            Some(Self::Left)
        }
    }

    pub fn known(self) -> bool {
        matches!(self, Self::Right)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub word_id: i64,
    /// Horizontal drag offset when the card was released
    pub offset_x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeOutcome {
    pub recorded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<SwipeDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known: Option<bool>,
}
