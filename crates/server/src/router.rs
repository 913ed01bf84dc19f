use super::{errors::handle_panic, handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let body_limit = app_state.config.max_body_bytes;
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metadata", post(handlers::metadata_handler))
        .route("/extract", post(handlers::extract_handler))
        .route("/process-pdf", post(handlers::process_pdf_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
