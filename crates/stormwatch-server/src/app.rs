use crate::state::AppState;
use crate::{api, logging};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub fn build_http_app(state: AppState) -> Router {
    // Permissive CORS so browser-side callers can trigger checks; the
    // layer answers OPTIONS pre-flight requests itself.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/v1/alerts/check", post(api::check_alerts))
        .route("/healthz", get(api::healthz))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}
