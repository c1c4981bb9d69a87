use axum::Json;
use axum::extract::{Multipart, State};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::UploadResponse;
use crate::state::AppState;
use crate::upload::parse_multipart;

/// `POST /upload-pdf`: extract questions for review. Nothing is saved.
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = parse_multipart(multipart).await?;
    tracing::info!(
        class = %form.class,
        filename = %form.file.filename,
        bytes = form.file.data.len(),
        "processing upload"
    );

    // MuPDF and the OCR subprocesses block.
    let pipeline = Arc::clone(&state.pipeline);
    let data = form.file.data;
    let output = tokio::task::spawn_blocking(move || pipeline.process(&data))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "extraction task failed");
            ApiError::Internal("Server error".into())
        })?;

    for failure in &output.acquisition.failures {
        tracing::debug!(class = %form.class, %failure, "recovered extraction failure");
    }

    Ok(Json(UploadResponse {
        message: "PDF processed, awaiting review.".into(),
        class: form.class,
        parsed_count: output.parsed_count(),
        questions: output.questions,
    }))
}
