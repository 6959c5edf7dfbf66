use tracing::error;

use backend_domain::EventRecord;

use crate::{AppError, AppState};

pub const DEFAULT_RECENT_LIMIT: usize = 50;
pub const MAX_RECENT_LIMIT: usize = 500;

pub async fn recent_events(
    state: &AppState,
    event_type: &str,
    limit: Option<usize>,
) -> Result<Vec<EventRecord>, AppError> {
    let limit = limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);
    let events = state
        .event_repo
        .fetch_recent(event_type, limit)
        .await
        .map_err(|err| {
            error!("failed to fetch recent events: {}", err);
            AppError::Internal(err)
        })?;
    Ok(events)
}
