use serde::{Deserialize, Serialize};

use crate::Question;

/// One answer a student submitted for a question.
///
/// Read leniently like [`QuestionDraft`](crate::QuestionDraft): a missing or
/// wrong-typed field is absent, and an answer without an id matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmittedAnswer {
    #[serde(deserialize_with = "crate::lenient::id")]
    pub id: Option<u32>,
    #[serde(deserialize_with = "crate::lenient::integer")]
    pub selected_index: Option<i64>,
}

/// Total score for a set of submitted answers.
///
/// A question scores its `points` (0 when unset) only if it has an answer
/// key and the selection matches it. Answers for unknown ids are ignored.
pub fn grade(questions: &[Question], answers: &[SubmittedAnswer]) -> f64 {
    answers
        .iter()
        .filter_map(|answer| {
            let id = answer.id?;
            let question = questions.iter().find(|q| q.id == id)?;
            let correct = i64::from(question.correct_answer_index?);
            (answer.selected_index == Some(correct)).then(|| question.points.unwrap_or(0.0))
        })
        .sum()
}
