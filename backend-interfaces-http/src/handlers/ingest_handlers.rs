use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::ingest_commands;
use backend_application::AppState;
use backend_domain::{EventReceipt, EventSubmission};

use crate::error::HttpError;
use crate::middleware::{caller_identity, origin_allowed};

pub async fn submit_event(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<(StatusCode, Json<EventReceipt>), HttpError> {
    // Every attempt counts, including the ones the origin gate turns away.
    state.metrics.record_request();

    if !origin_allowed(&headers) {
        state.metrics.record_origin_rejection();
        return Err(HttpError::Forbidden);
    }

    let submission: EventSubmission = serde_json::from_slice(&body).map_err(|err| {
        state.metrics.record_body_rejection();
        HttpError::BadRequest(format!("malformed JSON body: {}", err))
    })?;

    let caller = caller_identity(&headers);
    let receipt = ingest_commands::record_event(&state, &kind, submission, caller).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
