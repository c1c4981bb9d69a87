use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use std::sync::Arc;

use quizscan_core::Question;
use quizscan_parsing::sort_and_normalize;

use crate::error::ApiError;
use crate::models::{MessageResponse, SaveQuestionsRequest};
use crate::state::AppState;

/// `POST /save-questions`: sort, normalize and replace a class's set.
pub async fn save_questions(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveQuestionsRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    let (Some(class), Some(drafts)) = (req.class, req.questions) else {
        return Err(ApiError::BadRequest("Invalid data".into()));
    };
    if class.trim().is_empty() {
        return Err(ApiError::BadRequest("Invalid data".into()));
    }

    let questions = sort_and_normalize(drafts);
    let count = questions.len();
    // The file store writes to disk while holding its lock.
    let store = Arc::clone(&state.store);
    let key = class.clone();
    tokio::task::spawn_blocking(move || store.replace(&key, questions))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "save task failed");
            ApiError::Internal("Server error".into())
        })??;
    tracing::info!(%class, count, "saved question set");

    Ok(Json(MessageResponse::new(format!(
        "Saved {} questions for class {}.",
        count, class
    ))))
}

/// `GET /questions/{class}`
pub async fn get_questions(
    State(state): State<Arc<AppState>>,
    Path(class): Path<String>,
) -> Result<Json<Vec<Question>>, ApiError> {
    state
        .store
        .questions(&class)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No questions for this class".into()))
}
