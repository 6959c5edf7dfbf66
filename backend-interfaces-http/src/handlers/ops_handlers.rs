use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::AppState;

#[derive(serde::Serialize)]
struct ArchiveStatus {
    status: String,
    mode: String,
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    match timeout(timeout_duration, state.event_repo.ping()).await {
        Ok(Ok(_)) => StatusCode::OK,
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}

pub async fn archive_target_check(State(state): State<AppState>) -> impl IntoResponse {
    if !state.config.archive_configured() {
        // An unset target is not a failure.
        return (
            StatusCode::OK,
            Json(ArchiveStatus {
                status: "skipped".to_string(),
                mode: "unset".to_string(),
            }),
        )
            .into_response();
    }

    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    match timeout(
        timeout_duration,
        state.archive_service.check_archive_target(&state.config),
    )
    .await
    {
        Ok(Ok(_)) => (
            StatusCode::OK,
            Json(ArchiveStatus {
                status: "ok".to_string(),
                mode: "http".to_string(),
            }),
        )
            .into_response(),
        Ok(Err(err)) => {
            error!("archive target check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ArchiveStatus {
                    status: "error".to_string(),
                    mode: "http".to_string(),
                }),
            )
                .into_response()
        }
        Err(_) => {
            error!("archive target check timeout after {}s", timeout_secs);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ArchiveStatus {
                    status: "timeout".to_string(),
                    mode: "http".to_string(),
                }),
            )
                .into_response()
        }
    }
}
