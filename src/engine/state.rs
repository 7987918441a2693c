use std::cmp;
use std::collections::HashMap;

use crate::models::{
    OptionReview, Question, QuestionId, QuestionView, QuizDefinition, QuizView, Snapshot, Summary,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizStatus {
    #[default]
    Active,
    Finished,
}

/// State machine for one quiz attempt.
///
/// Two states: `Active` and `Finished`. The only transition is
/// `Active -> Finished`, taken by `finish()` or by `tick()` when the
/// countdown runs out. Navigation stays available after finishing so the
/// attempt can be reviewed; answer selection does not.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizEngine {
    title: String,
    time_limit_sec: u64,
    pass_threshold: f64,
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<QuestionId, usize>,
    remaining_sec: u64,
    status: QuizStatus,
    summary: Option<Summary>,
}

impl QuizEngine {
    pub fn new(definition: &QuizDefinition) -> Self {
        Self {
            title: definition.title.clone(),
            time_limit_sec: definition.time_limit_sec,
            pass_threshold: definition.pass_threshold,
            questions: definition.questions.clone(),
            current_index: 0,
            answers: HashMap::new(),
            remaining_sec: definition.time_limit_sec,
            status: QuizStatus::default(),
            summary: None,
        }
    }

    /// Builds an engine for `definition`, resuming from `snapshot` only when
    /// it was taken for a quiz with the same title. Any other snapshot is
    /// ignored and a fresh attempt is returned.
    pub fn from_snapshot(definition: &QuizDefinition, snapshot: Option<&Snapshot>) -> Self {
        let mut engine = Self::new(definition);

        let Some(snapshot) = snapshot else {
            return engine;
        };
        if snapshot.quiz_title != definition.title {
            return engine;
        }

        engine.current_index = engine.clamp_index(snapshot.current_index);
        engine.answers = snapshot.answers.clone();
        engine.remaining_sec = snapshot.remaining_sec.unwrap_or(definition.time_limit_sec);
        if snapshot.is_finished {
            engine.status = QuizStatus::Finished;
        }
        engine
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            quiz_title: self.title.clone(),
            current_index: self.current_index,
            answers: self.answers.clone(),
            remaining_sec: Some(self.remaining_sec),
            is_finished: self.is_finished(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn answers(&self) -> &HashMap<QuestionId, usize> {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answers.contains_key(&q.id))
            .count()
    }

    pub fn remaining_sec(&self) -> u64 {
        self.remaining_sec
    }

    pub fn status(&self) -> QuizStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == QuizStatus::Finished
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    fn clamp_index(&self, idx: usize) -> usize {
        cmp::min(idx, self.last_index())
    }

    pub fn next(&mut self) {
        self.current_index = self.clamp_index(self.current_index.saturating_add(1));
    }

    pub fn prev(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    pub fn go_to(&mut self, idx: usize) {
        self.current_index = self.clamp_index(idx);
    }

    /// Records `option_index` for the current question. Returns `false`
    /// without touching state when the attempt is finished or the index is
    /// not one of the question's options.
    pub fn select(&mut self, option_index: usize) -> bool {
        if self.is_finished() {
            return false;
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return false;
        };
        if !question.has_option(option_index) {
            return false;
        }

        self.answers.insert(question.id.clone(), option_index);
        true
    }

    pub fn selected(&self) -> Option<usize> {
        self.current_question()
            .and_then(|q| self.answers.get(&q.id).copied())
    }

    /// Advances the countdown by one second.
    ///
    /// Reaching zero finishes the attempt. Once finished, further ticks only
    /// return the cached summary and charge no time.
    pub fn tick(&mut self) -> Option<Summary> {
        if self.is_finished() || self.remaining_sec == 0 {
            return Some(self.finish());
        }

        self.remaining_sec -= 1;
        if self.remaining_sec == 0 {
            return Some(self.finish());
        }
        None
    }

    pub fn finish(&mut self) -> Summary {
        if let (QuizStatus::Finished, Some(summary)) = (self.status, self.summary) {
            return summary;
        }

        let summary = self.score();
        self.status = QuizStatus::Finished;
        self.summary = Some(summary);
        summary
    }

    fn score(&self) -> Summary {
        let total = self.questions.len();
        let correct = self
            .questions
            .iter()
            .filter(|q| q.is_correct(self.answers.get(&q.id).copied()))
            .count();
        let percent = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        };

        Summary {
            correct,
            total,
            percent,
            passed: percent >= self.pass_threshold,
        }
    }

    /// Per-option correctness for question `idx`; only available once the
    /// attempt is finished.
    pub fn review(&self, idx: usize) -> Option<Vec<OptionReview>> {
        if !self.is_finished() {
            return None;
        }
        let question = self.questions.get(idx)?;
        let selected = self.answers.get(&question.id).copied();

        Some(
            (0..question.options.len())
                .map(|i| OptionReview {
                    is_correct: i == question.correct_index,
                    was_selected: selected == Some(i),
                })
                .collect(),
        )
    }

    pub fn view(&self) -> QuizView {
        let total = self.questions.len();
        let selected = self.selected();
        let is_last = self.current_index >= self.last_index();
        // Moving forward requires an answer while the attempt is running.
        let can_go_next = !is_last && (self.is_finished() || selected.is_some());

        QuizView {
            title: self.title.clone(),
            current_index: self.current_index,
            total,
            question: self.current_question().map(|q| QuestionView {
                id: q.id.clone(),
                text: q.text.clone(),
                options: q.options.clone(),
                topic: q.topic.clone(),
            }),
            selected,
            answered_count: self.answered_count(),
            remaining_sec: self.remaining_sec,
            is_finished: self.is_finished(),
            can_go_prev: self.current_index > 0,
            can_go_next,
            review: self.review(self.current_index),
            summary: self.summary,
        }
    }
}
