use serde::{Deserialize, Serialize};

use quizscan_core::{Question, QuestionDraft, SubmittedAnswer};

// ── Requests ────────────────────────────────────────────────────────────
//
// Fields are optional so a missing value surfaces as a 400 from the handler
// rather than a deserialization rejection with a different message.

#[derive(Debug, Deserialize)]
pub struct SaveQuestionsRequest {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<QuestionDraft>>,
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub answers: Option<Vec<SubmittedAnswer>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub class: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ── Responses ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub class: String,
    pub parsed_count: usize,
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResponse {
    pub total_score: f64,
}
