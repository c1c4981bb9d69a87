use std::net::SocketAddr;
use std::sync::Arc;

use quizscan_core::config_file;
use quizscan_core::{JsonFileStore, UserRegistry};
use quizscan_ingest::QuestionPipeline;

mod error;
mod handlers;
mod models;
mod routes;
mod state;
mod template;
mod upload;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config_file::apply_env(config_file::load_config());

    let questions_path = config.questions_path();
    let store = JsonFileStore::open(&questions_path);
    let pipeline = QuestionPipeline::from_config(&config.extraction());

    let state = Arc::new(AppState {
        store: Arc::new(store),
        users: UserRegistry::new(),
        pipeline: Arc::new(pipeline),
        questions_path_display: questions_path.display().to_string(),
    });

    let app = routes::router(state, config.body_limit_mb() * 1024 * 1024);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
