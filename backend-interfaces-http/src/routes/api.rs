use axum::Router;

use backend_application::AppState;

use crate::handlers::{ingest_handlers, ops_handlers, query_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/events/:kind",
            axum::routing::post(ingest_handlers::submit_event)
                .get(query_handlers::list_events),
        )
        .route(
            "/api/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/api/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/api/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .route(
            "/api/ops/archive-target/check",
            axum::routing::get(ops_handlers::archive_target_check),
        )
        .with_state(state)
}
