use async_trait::async_trait;

use crate::entities::EventRecord;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn insert_event(&self, event: &EventRecord) -> anyhow::Result<()>;
    async fn fetch_event(&self, id: &str) -> anyhow::Result<Option<EventRecord>>;
    async fn fetch_recent(&self, event_type: &str, limit: usize) -> anyhow::Result<Vec<EventRecord>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait RateCounterRepository: Send + Sync {
    // A denied increment must not mutate the counter.
    async fn try_increment(
        &self,
        address: &str,
        window_start: i64,
        max_requests: u32,
    ) -> anyhow::Result<bool>;
    async fn delete_older_than(&self, cutoff: i64) -> anyhow::Result<u64>;
}

#[async_trait]
pub trait IdempotencyRepository: Send + Sync {
    // Stale records are overwritten and admitted.
    async fn try_admit(
        &self,
        digest: &str,
        now: i64,
        dedupe_window_seconds: i64,
    ) -> anyhow::Result<bool>;
    async fn delete_older_than(&self, cutoff: i64) -> anyhow::Result<u64>;
}
