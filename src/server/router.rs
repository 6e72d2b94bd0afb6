//! HTTP router assembly

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{AudioDownloader, TimestampOracle};
use crate::infrastructure::observability::request_id_middleware;
use crate::server::handlers::{ask_handler, health_handler};
use crate::server::state::AppState;

pub fn create_router<D, O>(state: AppState<D, O>) -> Router
where
    D: AudioDownloader + 'static,
    O: TimestampOracle + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/ask", post(ask_handler::<D, O>))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
