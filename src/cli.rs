//! Plain-text rendering for the terminal front end.

use crate::engine::ReviewItem;
use crate::models::{QuizView, Summary};

pub const HELP: &str = "\
Commands:
  <n> | select <n>   choose option n for the current question
  next | n           go to the next question
  prev | p           go to the previous question
  goto <n> | g <n>   jump to question n
  finish | f         submit the quiz
  review | r         show every question with the correct answers (after finishing)
  status             show the current question again
  restart            discard progress and start over
  help | ?           show this help
  quit | q           leave; progress is kept for next time";

pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn render_view(view: &QuizView) -> String {
    let status = if view.is_finished {
        "finished".to_string()
    } else {
        format!("{} left", format_clock(view.remaining_sec))
    };
    let mut lines = vec![format!(
        "{} | question {}/{} | answered {}/{} | {status}",
        view.title,
        view.current_index + 1,
        view.total,
        view.answered_count,
        view.total,
    )];

    let Some(question) = &view.question else {
        lines.push("(this quiz has no questions)".to_string());
        return lines.join("\n");
    };

    lines.push(String::new());
    lines.push(match &question.topic {
        Some(topic) => format!("[{topic}] {}", question.text),
        None => question.text.clone(),
    });

    for (i, option) in question.options.iter().enumerate() {
        let mark = if view.selected == Some(i) { "[x]" } else { "[ ]" };
        let note = match view.review.as_ref().and_then(|r| r.get(i)) {
            Some(review) if review.is_correct => "  (correct)",
            Some(review) if review.was_selected => "  (your answer)",
            _ => "",
        };
        lines.push(format!("  {mark} {}. {option}{note}", i + 1));
    }

    let mut hints = Vec::new();
    if view.can_go_prev {
        hints.push("prev");
    }
    if view.can_go_next {
        hints.push("next");
    }
    if !view.is_finished {
        hints.push("finish");
    }
    if !hints.is_empty() {
        lines.push(String::new());
        lines.push(format!("> {}", hints.join(" | ")));
    }
    lines.join("\n")
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Score: {}/{} ({}) - {}",
        summary.correct,
        summary.total,
        summary.percent_display(),
        if summary.passed { "PASSED" } else { "FAILED" }
    )
}

pub fn render_review(items: &[ReviewItem]) -> String {
    let mut lines = Vec::new();
    for (n, item) in items.iter().enumerate() {
        lines.push(format!("{}. {}", n + 1, item.question.text));
        for (i, option) in item.question.options.iter().enumerate() {
            let flags = item.options.get(i).copied().unwrap_or_default();
            let mark = match (flags.is_correct, flags.was_selected) {
                (true, true) => "✓",
                (true, false) => "→",
                (false, true) => "✗",
                (false, false) => " ",
            };
            lines.push(format!("   {mark} {option}"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OptionReview, Question, QuestionId, QuestionView};

    fn view() -> QuizView {
        QuizView {
            title: "Rust basics".into(),
            current_index: 0,
            total: 2,
            question: Some(QuestionView {
                id: QuestionId::new("q1"),
                text: "Which keyword declares a constant?".into(),
                options: vec!["let".into(), "const".into()],
                topic: Some("syntax".into()),
            }),
            selected: Some(0),
            answered_count: 1,
            remaining_sec: 75,
            is_finished: false,
            can_go_prev: false,
            can_go_next: true,
            review: None,
            summary: None,
        }
    }

    #[test]
    fn formats_clock_as_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn renders_active_question() {
        let out = render_view(&view());
        assert!(out.contains("question 1/2"));
        assert!(out.contains("01:15 left"));
        assert!(out.contains("[syntax] Which keyword declares a constant?"));
        assert!(out.contains("[x] 1. let"));
        assert!(out.contains("[ ] 2. const"));
        assert!(out.contains("> next | finish"));
        assert_eq!(out.lines().nth(2), Some("[syntax] Which keyword declares a constant?"));
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn renders_empty_quiz_notice() {
        let mut view = view();
        view.question = None;
        let out = render_view(&view);
        assert_eq!(out.lines().count(), 2);
        assert!(out.ends_with("(this quiz has no questions)"));
    }

    #[test]
    fn renders_review_marks_when_finished() {
        let mut view = view();
        view.is_finished = true;
        view.review = Some(vec![
            OptionReview { is_correct: false, was_selected: true },
            OptionReview { is_correct: true, was_selected: false },
        ]);

        let out = render_view(&view);
        assert!(out.contains("finished"));
        assert!(out.contains("1. let  (your answer)"));
        assert!(out.contains("2. const  (correct)"));
        assert!(!out.contains("finish |"));
    }

    #[test]
    fn renders_summary_line() {
        let summary = Summary { correct: 3, total: 4, percent: 0.75, passed: true };
        assert_eq!(render_summary(&summary), "Score: 3/4 (75%) - PASSED");
    }

    #[test]
    fn renders_review_items() {
        let items = vec![ReviewItem {
            question: Question {
                id: QuestionId::new("q1"),
                text: "Pick".into(),
                options: vec!["a".into(), "b".into()],
                correct_index: 1,
                topic: None,
            },
            options: vec![
                OptionReview { is_correct: false, was_selected: true },
                OptionReview { is_correct: true, was_selected: false },
            ],
        }];
        let out = render_review(&items);
        assert!(out.contains("1. Pick"));
        assert!(out.contains("✗ a"));
        assert!(out.contains("→ b"));
    }
}
