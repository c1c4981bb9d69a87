use std::sync::Arc;

use quizscan_core::{QuestionStore, UserRegistry};
use quizscan_ingest::QuestionPipeline;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
    pub users: UserRegistry,
    /// Shared with blocking tasks, hence its own `Arc`.
    pub pipeline: Arc<QuestionPipeline>,
    pub questions_path_display: String,
}
