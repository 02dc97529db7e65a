//! HTTP surface
//!
//! Landing page, input form, prediction endpoint and static assets.

pub mod handlers;
pub mod pages;

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::predict::Predictor;
use crate::{Config, Result};

/// State shared by all requests
#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
}

pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::index))
        .route(
            "/predict",
            get(handlers::prediction_form).post(handlers::predict),
        )
        .route("/health", get(handlers::health))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Serve until the process is stopped
pub async fn serve(config: &Config, predictor: Predictor) -> Result<()> {
    if !predictor.is_loaded() {
        log::warn!("Serving without a model; predictions will report it as not loaded");
    }

    let app = router(AppState { predictor }, &config.server.static_dir);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
