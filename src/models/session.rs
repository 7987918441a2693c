//! Attempt-level data models.
//!
//! - `Snapshot`: the minimal state persisted after every mutation so an
//!   attempt can be resumed after a restart.
//! - `Summary`: the scoring result of a finished attempt.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::QuestionId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub quiz_title: String,
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub answers: HashMap<QuestionId, usize>,
    /// Missing on older payloads; resumes with the full time limit.
    #[serde(default)]
    pub remaining_sec: Option<u64>,
    #[serde(default)]
    pub is_finished: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub correct: usize,
    pub total: usize,
    /// Fraction in `[0, 1]`, not a 0-100 value.
    pub percent: f64,
    pub passed: bool,
}

impl Summary {
    pub fn percent_display(&self) -> String {
        format!("{:.0}%", self.percent * 100.0)
    }
}
