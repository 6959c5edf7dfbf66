use std::sync::Arc;

use backend_domain::ports::{
    ArchiveService, Clock, EventRepository, IdempotencyRepository, RateCounterRepository,
};
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_repo: Arc<dyn EventRepository>,
    pub rate_repo: Arc<dyn RateCounterRepository>,
    pub idempotency_repo: Arc<dyn IdempotencyRepository>,
    pub archive_service: Arc<dyn ArchiveService>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<Metrics>,
}
