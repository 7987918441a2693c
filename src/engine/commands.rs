use std::str::FromStr;

use anyhow::{anyhow, bail, Error};

use crate::models::{OptionReview, Question, QuizView, Summary};

use super::QuizController;

/// A user action, as typed at the prompt. Indices are zero-based here; the
/// text form is one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCommand {
    Next,
    Prev,
    GoTo(usize),
    Select(usize),
    Finish,
    Review,
    Status,
    Restart,
    Help,
    Quit,
}

fn parse_position(raw: &str, what: &str) -> Result<usize, Error> {
    let value: usize = raw
        .parse()
        .map_err(|_| anyhow!("'{raw}' is not a {what} number"))?;
    if value == 0 {
        bail!("{what}s are numbered from 1");
    }
    Ok(value - 1)
}

impl FromStr for QuizCommand {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split_whitespace();
        let Some(head) = parts.next() else {
            bail!("empty command");
        };
        let arg = parts.next();
        if parts.next().is_some() {
            bail!("too many arguments in '{}'", input.trim());
        }

        let command = match (head.to_ascii_lowercase().as_str(), arg) {
            ("next" | "n", None) => QuizCommand::Next,
            ("prev" | "p", None) => QuizCommand::Prev,
            ("goto" | "g", Some(arg)) => QuizCommand::GoTo(parse_position(arg, "question")?),
            ("select" | "s", Some(arg)) => QuizCommand::Select(parse_position(arg, "option")?),
            ("finish" | "f", None) => QuizCommand::Finish,
            ("review" | "r", None) => QuizCommand::Review,
            ("status", None) => QuizCommand::Status,
            ("restart", None) => QuizCommand::Restart,
            ("help" | "h" | "?", None) => QuizCommand::Help,
            ("quit" | "q" | "exit", None) => QuizCommand::Quit,
            (number, None) if number.chars().all(|c| c.is_ascii_digit()) => {
                QuizCommand::Select(parse_position(number, "option")?)
            }
            _ => bail!("unknown command '{}'", input.trim()),
        };
        Ok(command)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub question: Question,
    pub options: Vec<OptionReview>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    View(QuizView),
    Finished { summary: Summary, view: QuizView },
    /// `None` while the attempt is still running.
    Review(Option<Vec<ReviewItem>>),
    Help,
    Quit,
}

pub async fn dispatch(controller: &QuizController, command: QuizCommand) -> CommandOutcome {
    match command {
        QuizCommand::Next => CommandOutcome::View(controller.next().await),
        QuizCommand::Prev => CommandOutcome::View(controller.prev().await),
        QuizCommand::GoTo(idx) => CommandOutcome::View(controller.go_to(idx).await),
        QuizCommand::Select(option) => CommandOutcome::View(controller.select(option).await),
        QuizCommand::Finish => {
            let summary = controller.finish().await;
            CommandOutcome::Finished {
                summary,
                view: controller.view().await,
            }
        }
        QuizCommand::Review => {
            let questions = &controller.definition().questions;
            let mut items = Vec::with_capacity(questions.len());
            for (idx, question) in questions.iter().enumerate() {
                let Some(options) = controller.review(idx).await else {
                    return CommandOutcome::Review(None);
                };
                items.push(ReviewItem {
                    question: question.clone(),
                    options,
                });
            }
            CommandOutcome::Review(Some(items))
        }
        QuizCommand::Status => CommandOutcome::View(controller.view().await),
        QuizCommand::Restart => CommandOutcome::View(controller.restart().await),
        QuizCommand::Help => CommandOutcome::Help,
        QuizCommand::Quit => CommandOutcome::Quit,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{QuestionId, QuizDefinition};
    use crate::settings::RunnerConfig;
    use crate::storage::MemorySnapshotStore;

    #[test]
    fn parses_one_based_positions() {
        assert_eq!("3".parse::<QuizCommand>().unwrap(), QuizCommand::Select(2));
        assert_eq!("select 1".parse::<QuizCommand>().unwrap(), QuizCommand::Select(0));
        assert_eq!("goto 4".parse::<QuizCommand>().unwrap(), QuizCommand::GoTo(3));
        assert_eq!("  G 2 ".parse::<QuizCommand>().unwrap(), QuizCommand::GoTo(1));
    }

    #[test]
    fn parses_keywords_and_aliases() {
        let cases = [
            ("next", QuizCommand::Next),
            ("n", QuizCommand::Next),
            ("PREV", QuizCommand::Prev),
            ("finish", QuizCommand::Finish),
            ("review", QuizCommand::Review),
            ("status", QuizCommand::Status),
            ("restart", QuizCommand::Restart),
            ("?", QuizCommand::Help),
            ("q", QuizCommand::Quit),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<QuizCommand>().unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn rejects_bad_input() {
        for input in ["", "0", "goto", "goto x", "next 2", "jump", "select 1 2"] {
            assert!(input.parse::<QuizCommand>().is_err(), "{input:?}");
        }
    }

    fn controller() -> QuizController {
        let definition = QuizDefinition {
            title: "Dispatch".into(),
            time_limit_sec: 60,
            pass_threshold: 1.0,
            questions: vec![
                Question {
                    id: QuestionId::new("only"),
                    text: "Only question".into(),
                    options: vec!["yes".into(), "no".into()],
                    correct_index: 0,
                    topic: None,
                },
            ],
        };
        QuizController::new(
            definition,
            Arc::new(MemorySnapshotStore::new()),
            &RunnerConfig::default(),
        )
    }

    #[tokio::test]
    async fn review_requires_a_finished_attempt() {
        let controller = controller();
        assert_eq!(
            dispatch(&controller, QuizCommand::Review).await,
            CommandOutcome::Review(None)
        );

        dispatch(&controller, QuizCommand::Select(0)).await;
        let CommandOutcome::Finished { summary, view } =
            dispatch(&controller, QuizCommand::Finish).await
        else {
            panic!("finish should report a summary");
        };
        assert!(summary.passed);
        assert!(view.is_finished);

        let CommandOutcome::Review(Some(items)) = dispatch(&controller, QuizCommand::Review).await
        else {
            panic!("review should be available");
        };
        assert_eq!(items.len(), 1);
        assert!(items[0].options[0].is_correct && items[0].options[0].was_selected);
    }

    #[tokio::test]
    async fn select_and_status_report_the_view() {
        let controller = controller();
        let CommandOutcome::View(view) = dispatch(&controller, QuizCommand::Select(1)).await else {
            panic!("select returns a view");
        };
        assert_eq!(view.selected, Some(1));

        let CommandOutcome::View(view) = dispatch(&controller, QuizCommand::Status).await else {
            panic!("status returns a view");
        };
        assert_eq!(view.answered_count, 1);
    }
}
