use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use log::info;

use crate::models::QuizDefinition;

/// Reads and validates the question set. Any failure here is fatal for the
/// runner: there is nothing to resume without a quiz.
pub fn load_definition(path: impl AsRef<Path>) -> Result<QuizDefinition> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read quiz from {}", path.display()))?;
    let definition = parse_definition(&contents)
        .with_context(|| format!("Invalid quiz file {}", path.display()))?;

    info!(
        "Loaded quiz '{}' ({} questions, {}s limit) from {}",
        definition.title,
        definition.questions.len(),
        definition.time_limit_sec,
        path.display()
    );
    Ok(definition)
}

pub fn parse_definition(raw: &str) -> Result<QuizDefinition> {
    let definition: QuizDefinition =
        serde_json::from_str(raw).context("failed to parse quiz definition")?;

    if definition.questions.is_empty() {
        bail!("quiz '{}' contains no questions", definition.title);
    }
    Ok(definition)
}
