use async_trait::async_trait;

use crate::entities::{EventRecord, RuntimeConfig};

#[async_trait]
pub trait ArchiveService: Send + Sync {
    // Must never surface failures to the caller.
    fn spawn_sync(&self, config: RuntimeConfig, event: EventRecord);
    async fn check_archive_target(&self, config: &RuntimeConfig) -> anyhow::Result<()>;
}

pub trait Clock: Send + Sync {
    fn now_secs(&self) -> i64;
}
