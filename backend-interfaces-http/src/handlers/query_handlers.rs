use axum::extract::{Path, Query, State};
use axum::Json;

use backend_application::queries::event_queries;
use backend_application::AppState;
use backend_domain::EventRecord;

use crate::error::HttpError;

#[derive(serde::Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

// Read-only, so no origin requirement.
pub async fn list_events(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<EventRecord>>, HttpError> {
    let events = event_queries::recent_events(&state, &kind, query.limit).await?;
    Ok(Json(events))
}
