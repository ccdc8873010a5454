pub mod error;
pub mod routes;
pub mod state;
pub mod worker;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 2 GB body limit for media uploads
    let api = Router::new()
        .route("/upload", post(routes::upload::upload))
        .route("/rerun", post(routes::upload::rerun))
        .route("/job/{job_id}", get(routes::job::get_job))
        .route("/file", get(routes::file::list))
        .route(
            "/transcript/{basename}/edits",
            post(routes::transcript::save_edits),
        )
        .route(
            "/transcript/{basename}/speakers",
            post(routes::transcript::update_speakers),
        )
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024 * 1024));

    // Health check
    let health = Router::new().route("/health", get(health_check));

    let files_dir = state.settings.transcription_dir.clone();

    Router::new()
        .nest("/api", api)
        .merge(health)
        .nest_service("/files", ServeDir::new(files_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
