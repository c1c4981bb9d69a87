use serde::{Deserialize, Deserializer, Serialize};

pub mod backend;
pub mod config_file;
pub mod grading;
pub mod store;
pub mod users;

// Re-export for convenience
pub use backend::{
    BackendError, Rasterizer, RasterizationError, RecognitionError, Recognizer, TextExtractor,
};
pub use grading::{SubmittedAnswer, grade};
pub use store::{JsonFileStore, MemoryStore, QuestionStore, StoreError};
pub use users::{Role, UserError, UserProfile, UserRegistry};

/// Number of answer slots every normalized question carries (labels A–D).
pub const CHOICE_COUNT: usize = 4;

/// A multiple-choice question after normalization.
///
/// `choices` is a fixed array, so "exactly four slots" holds by construction.
/// `correct_answer_index` and `points` are never produced by parsing; they are
/// filled in by a human reviewer before the set is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub choices: [String; CHOICE_COUNT],
    pub correct_answer_index: Option<u8>,
    pub points: Option<f64>,
    pub image: Option<String>,
}

/// A question as it comes out of the parser or in from a client, before
/// normalization.
///
/// Numeric fields are read leniently: a value of the wrong JSON type is
/// treated as absent rather than failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionDraft {
    #[serde(deserialize_with = "lenient::id")]
    pub id: Option<u32>,
    #[serde(deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(deserialize_with = "lenient::choices")]
    pub choices: Vec<String>,
    #[serde(deserialize_with = "lenient::integer")]
    pub correct_answer_index: Option<i64>,
    #[serde(deserialize_with = "lenient::number")]
    pub points: Option<f64>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub image: Option<String>,
}

impl QuestionDraft {
    /// A freshly parsed question: no answer key, no score, no image.
    pub fn parsed(id: Option<u32>, text: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            id,
            text: text.into(),
            choices,
            ..Self::default()
        }
    }

    /// Sort key used everywhere questions are ordered: missing ids sort as 0.
    pub fn sort_key(&self) -> u32 {
        self.id.unwrap_or(0)
    }
}

impl From<Question> for QuestionDraft {
    fn from(q: Question) -> Self {
        Self {
            id: Some(q.id),
            text: q.text,
            choices: q.choices.into_iter().collect(),
            correct_answer_index: q.correct_answer_index.map(i64::from),
            points: q.points,
            image: q.image,
        }
    }
}

mod lenient {
    use super::*;
    use serde_json::Value;

    fn value<'de, D: Deserializer<'de>>(d: D) -> Result<Value, D::Error> {
        Value::deserialize(d)
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(value(d)?
            .as_u64()
            .and_then(|n| u32::try_from(n).ok()))
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(value(d)?.as_i64())
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(value(d)?.as_f64())
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text_opt(d)?.unwrap_or_default())
    }

    pub fn text_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match value(d)? {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        })
    }

    pub fn choices<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match value(d)? {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        })
    }
}
