use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;

use backend_domain::ports::{EventRepository, IdempotencyRepository, RateCounterRepository};
use backend_domain::EventRecord;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl EventRepository for SqliteStore {
    async fn ensure_schema(&self) -> Result<()> {
        let create_events = r#"
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    event_type TEXT NOT NULL,
    amount_oz REAL,
    created_at INTEGER NOT NULL,
    source TEXT,
    note TEXT,
    client_agent TEXT
)
"#;
        sqlx::query(create_events).execute(&self.pool).await?;

        let create_events_index = r#"
CREATE INDEX IF NOT EXISTS idx_events_type_created
ON events (event_type, created_at DESC)
"#;
        sqlx::query(create_events_index).execute(&self.pool).await?;

        let create_rate_counters = r#"
CREATE TABLE IF NOT EXISTS rate_counters (
    address TEXT NOT NULL,
    window_start INTEGER NOT NULL,
    request_count INTEGER NOT NULL,
    PRIMARY KEY (address, window_start)
)
"#;
        sqlx::query(create_rate_counters).execute(&self.pool).await?;

        let create_rate_index = r#"
CREATE INDEX IF NOT EXISTS idx_rate_counters_window
ON rate_counters (window_start)
"#;
        sqlx::query(create_rate_index).execute(&self.pool).await?;

        let create_idempotency = r#"
CREATE TABLE IF NOT EXISTS idempotency_records (
    digest TEXT PRIMARY KEY,
    created_at INTEGER NOT NULL
)
"#;
        sqlx::query(create_idempotency).execute(&self.pool).await?;

        let create_idempotency_index = r#"
CREATE INDEX IF NOT EXISTS idx_idempotency_created
ON idempotency_records (created_at)
"#;
        sqlx::query(create_idempotency_index)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_event(&self, event: &EventRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO events (id, event_type, amount_oz, created_at, source, note, client_agent) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(&event.event_type)
        .bind(event.amount_oz)
        .bind(event.created_at)
        .bind(&event.source)
        .bind(&event.note)
        .bind(&event.client_agent)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_event(&self, id: &str) -> Result<Option<EventRecord>> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, event_type, amount_oz, created_at, source, note, client_agent \
             FROM events WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(EventRecord::from))
    }

    async fn fetch_recent(&self, event_type: &str, limit: usize) -> Result<Vec<EventRecord>> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, event_type, amount_oz, created_at, source, note, client_agent \
             FROM events WHERE event_type = ? \
             ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(event_type)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(EventRecord::from).collect())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RateCounterRepository for SqliteStore {
    async fn try_increment(
        &self,
        address: &str,
        window_start: i64,
        max_requests: u32,
    ) -> Result<bool> {
        if max_requests == 0 {
            return Ok(false);
        }
        // No row comes back when the counter already sits at the cap.
        let admitted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO rate_counters (address, window_start, request_count) \
             VALUES (?1, ?2, 1) \
             ON CONFLICT(address, window_start) DO UPDATE \
             SET request_count = request_count + 1 \
             WHERE rate_counters.request_count < ?3 \
             RETURNING request_count",
        )
        .bind(address)
        .bind(window_start)
        .bind(max_requests as i64)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admitted.is_some())
    }

    async fn delete_older_than(&self, cutoff: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM rate_counters WHERE window_start < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl IdempotencyRepository for SqliteStore {
    async fn try_admit(&self, digest: &str, now: i64, dedupe_window_seconds: i64) -> Result<bool> {
        // Only a fresh insert or a stale overwrite returns a row.
        let admitted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO idempotency_records (digest, created_at) \
             VALUES (?1, ?2) \
             ON CONFLICT(digest) DO UPDATE \
             SET created_at = excluded.created_at \
             WHERE ?2 - idempotency_records.created_at >= ?3 \
             RETURNING created_at",
        )
        .bind(digest)
        .bind(now)
        .bind(dedupe_window_seconds)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admitted.is_some())
    }

    async fn delete_older_than(&self, cutoff: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM idempotency_records WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct EventRow {
    id: String,
    event_type: String,
    amount_oz: Option<f64>,
    created_at: i64,
    source: Option<String>,
    note: Option<String>,
    client_agent: Option<String>,
}

impl From<EventRow> for EventRecord {
    fn from(row: EventRow) -> Self {
        EventRecord {
            id: row.id,
            event_type: row.event_type,
            amount_oz: row.amount_oz,
            created_at: row.created_at,
            source: row.source,
            note: row.note,
            client_agent: row.client_agent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("droplog-test.db");
        let store = SqliteStore::connect(path.to_str().expect("utf8 path"))
            .await
            .expect("connect");
        store.ensure_schema().await.expect("ensure schema");
        (store, dir)
    }

    fn sample_event(id: &str, created_at: i64) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            event_type: "water".to_string(),
            amount_oz: Some(32.0),
            created_at,
            source: Some("tap".to_string()),
            note: None,
            client_agent: Some("droplog-test".to_string()),
        }
    }

    #[tokio::test]
    async fn insert_then_fetch_round_trips_event_fields() {
        let (store, _dir) = open_store().await;
        let event = sample_event("evt-1", 1000);
        store.insert_event(&event).await.expect("insert");

        let found = store
            .fetch_event("evt-1")
            .await
            .expect("fetch")
            .expect("event present");
        assert_eq!(found.event_type, "water");
        assert_eq!(found.amount_oz, Some(32.0));
        assert_eq!(found.created_at, 1000);
        assert_eq!(found.source.as_deref(), Some("tap"));
        assert!(found.note.is_none());

        let missing = store.fetch_event("evt-x").await.expect("fetch missing");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn fetch_recent_filters_by_type_and_orders_newest_first() {
        let (store, _dir) = open_store().await;
        for (id, created_at) in [("evt-1", 100), ("evt-2", 200), ("evt-3", 300)] {
            store
                .insert_event(&sample_event(id, created_at))
                .await
                .expect("insert");
        }
        let mut other = sample_event("evt-coffee", 400);
        other.event_type = "coffee".to_string();
        store.insert_event(&other).await.expect("insert other type");

        let recent = store.fetch_recent("water", 2).await.expect("fetch recent");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "evt-3");
        assert_eq!(recent[1].id, "evt-2");
    }

    #[tokio::test]
    async fn rate_counter_admits_until_cap_then_stops_mutating() {
        let (store, _dir) = open_store().await;

        assert!(store.try_increment("a", 960, 2).await.expect("first"));
        assert!(store.try_increment("a", 960, 2).await.expect("second"));
        assert!(!store.try_increment("a", 960, 2).await.expect("third"));
        assert!(!store.try_increment("a", 960, 2).await.expect("fourth"));

        // Denials above must not have advanced the counter.
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT request_count FROM rate_counters WHERE address = 'a' AND window_start = 960",
        )
        .fetch_one(&store.pool)
        .await
        .expect("read counter");
        assert_eq!(count, 2);

        assert!(store.try_increment("a", 1020, 2).await.expect("next window"));
        assert!(store.try_increment("b", 960, 2).await.expect("other address"));
    }

    #[tokio::test]
    async fn rate_counter_cap_of_zero_denies_without_rows() {
        let (store, _dir) = open_store().await;
        assert!(!store.try_increment("a", 960, 0).await.expect("denied"));

        let rows = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rate_counters")
            .fetch_one(&store.pool)
            .await
            .expect("count rows");
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn idempotency_rejects_inside_window_and_overwrites_stale_records() {
        let (store, _dir) = open_store().await;

        assert!(store.try_admit("digest-1", 1000, 5).await.expect("fresh"));
        assert!(!store.try_admit("digest-1", 1002, 5).await.expect("inside window"));
        assert!(store.try_admit("digest-1", 1010, 5).await.expect("stale overwritten"));
        assert!(!store.try_admit("digest-1", 1012, 5).await.expect("new window holds"));

        assert!(store.try_admit("digest-2", 1002, 5).await.expect("other digest"));
    }

    #[tokio::test]
    async fn delete_older_than_prunes_bookkeeping_rows() {
        let (store, _dir) = open_store().await;

        assert!(store.try_increment("a", 0, 10).await.expect("old window"));
        assert!(store.try_increment("a", 960, 10).await.expect("live window"));
        let removed = RateCounterRepository::delete_older_than(&store, 900)
            .await
            .expect("prune counters");
        assert_eq!(removed, 1);

        assert!(store.try_admit("old", 10, 5).await.expect("old record"));
        assert!(store.try_admit("live", 1000, 5).await.expect("live record"));
        let removed = IdempotencyRepository::delete_older_than(&store, 900)
            .await
            .expect("prune records");
        assert_eq!(removed, 1);

        store.ping().await.expect("ping");
    }
}
