use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

use quizscan_core::grade;

use crate::error::ApiError;
use crate::models::{GradeRequest, GradeResponse};
use crate::state::AppState;

/// `POST /grade`
pub async fn grade_answers(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GradeRequest>, JsonRejection>,
) -> Result<Json<GradeResponse>, ApiError> {
    let Json(req) = payload?;
    let (Some(class), Some(answers)) = (req.class, req.answers) else {
        return Err(ApiError::BadRequest("Invalid data".into()));
    };
    if class.trim().is_empty() {
        return Err(ApiError::BadRequest("Invalid data".into()));
    }

    let questions = state
        .store
        .questions(&class)
        .ok_or_else(|| ApiError::NotFound("No questions for this class".into()))?;

    Ok(Json(GradeResponse {
        total_score: grade(&questions, &answers),
    }))
}
