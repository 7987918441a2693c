use serde::Serialize;

use super::{QuestionId, Summary};

/// Everything a front end needs to render the current screen.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub title: String,
    pub current_index: usize,
    pub total: usize,
    pub question: Option<QuestionView>,
    pub selected: Option<usize>,
    pub answered_count: usize,
    pub remaining_sec: u64,
    pub is_finished: bool,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    /// Populated only once the attempt is finished.
    pub review: Option<Vec<OptionReview>>,
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OptionReview {
    pub is_correct: bool,
    pub was_selected: bool,
}
