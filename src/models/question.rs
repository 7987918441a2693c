//! Question-set data models.
//!
//! A `QuizDefinition` is the document the runner is started with. It is
//! immutable once loaded; all mutable attempt state lives in the engine.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Stable identifier of a question.
///
/// Source documents may use either strings or integers. Integers are
/// normalized to their decimal text so that ids survive a trip through a
/// JSON object key (snapshot `answers`) unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for QuestionId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> de::Visitor<'de> for IdVisitor {
            type Value = QuestionId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer question id")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(QuestionId(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(QuestionId(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(QuestionId(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(QuestionId(value.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    /// Trusted as a valid index into `options`; never checked.
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Question {
    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        selected == Some(self.correct_index)
    }

    pub fn has_option(&self, index: usize) -> bool {
        index < self.options.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizDefinition {
    pub title: String,
    pub time_limit_sec: u64,
    /// Fraction of correct answers in `[0, 1]` required to pass.
    pub pass_threshold: f64,
    #[serde(default)]
    pub questions: Vec<Question>,
}
