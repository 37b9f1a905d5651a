//! Route definitions

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::{handlers, state::AppState};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(r#"<p>Not found. Visit <a href="/">the home page</a>.</p>"#),
    )
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
        .route(
            "/forecasting",
            get(handlers::forecasting_form).post(handlers::forecasting),
        )
        .route(
            "/fraudulent",
            get(handlers::fraudulent_form).post(handlers::fraudulent),
        )
        .route("/health", get(handlers::health))
        .fallback(handle_404)
        .with_state(state)
        // Upload size is deliberately unbounded
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}
