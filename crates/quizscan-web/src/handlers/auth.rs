use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

use quizscan_core::UserProfile;

use crate::error::ApiError;
use crate::models::{LoginRequest, MessageResponse, RegisterRequest};
use crate::state::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    state
        .users
        .register(&req.username, &req.password, &req.class)?;
    Ok(Json(MessageResponse::new("Registration successful")))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(req) = payload?;
    let profile = state.users.login(&req.username, &req.password)?;
    Ok(Json(profile))
}
