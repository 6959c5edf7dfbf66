use std::sync::Arc;

use anyhow::Result;

use backend_application::{AppState, Metrics};
use backend_domain::ports::EventRepository;
use backend_infrastructure::{AppConfig, HttpArchiveService, SqliteStore, SystemClock};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();

        let store = Arc::new(SqliteStore::connect(&config.database_path).await?);
        store.ensure_schema().await?;

        let metrics = Arc::new(Metrics::default());
        let state = AppState {
            config: runtime_config,
            event_repo: store.clone(),
            rate_repo: store.clone(),
            idempotency_repo: store,
            archive_service: Arc::new(HttpArchiveService::new(metrics.clone())),
            clock: Arc::new(SystemClock::new()),
            metrics,
        };

        Ok(Self { state })
    }
}
