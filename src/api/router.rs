use super::AppState;
use super::{handlers, middleware};
use axum::Router;
use axum::routing::get;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Builds the full router: API routes, static file fallback, and the CORS
/// and access-log layers around all of it.
pub fn build(state: Arc<AppState>, static_dir: &Path) -> Router {
    let static_files = Router::new()
        .fallback_service(ServeDir::new(static_dir))
        .layer(axum::middleware::from_fn(middleware::static_files));

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/currencies", get(handlers::get_currencies))
        .route("/api/convert", get(handlers::convert))
        .with_state(state)
        .merge(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::cors))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::request_span)
                        .on_response(middleware::log_response),
                ),
        )
}
