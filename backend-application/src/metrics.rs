use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_requests: AtomicU64,
    ingest_accepted: AtomicU64,
    rejected_origin: AtomicU64,
    rejected_body: AtomicU64,
    rejected_amount: AtomicU64,
    rate_limited: AtomicU64,
    duplicates: AtomicU64,
    persistence_errors: AtomicU64,
    archive_syncs: AtomicU64,
    archive_errors: AtomicU64,
}

impl Metrics {
    pub fn record_request(&self) {
        self.ingest_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_accepted(&self) {
        self.ingest_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_origin_rejection(&self) {
        self.rejected_origin.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_body_rejection(&self) {
        self.rejected_body.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_amount_rejection(&self) {
        self.rejected_amount.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persistence_error(&self) {
        self.persistence_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_archive_sync(&self) {
        self.archive_syncs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_archive_error(&self) {
        self.archive_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        format!(
            "# TYPE droplog_ingest_requests_total counter\n\
droplog_ingest_requests_total {}\n\
# TYPE droplog_ingest_accepted_total counter\n\
droplog_ingest_accepted_total {}\n\
# TYPE droplog_rejected_origin_total counter\n\
droplog_rejected_origin_total {}\n\
# TYPE droplog_rejected_body_total counter\n\
droplog_rejected_body_total {}\n\
# TYPE droplog_rejected_amount_total counter\n\
droplog_rejected_amount_total {}\n\
# TYPE droplog_rate_limited_total counter\n\
droplog_rate_limited_total {}\n\
# TYPE droplog_duplicates_total counter\n\
droplog_duplicates_total {}\n\
# TYPE droplog_persistence_errors_total counter\n\
droplog_persistence_errors_total {}\n\
# TYPE droplog_archive_syncs_total counter\n\
droplog_archive_syncs_total {}\n\
# TYPE droplog_archive_errors_total counter\n\
droplog_archive_errors_total {}\n",
            self.ingest_requests.load(Ordering::Relaxed),
            self.ingest_accepted.load(Ordering::Relaxed),
            self.rejected_origin.load(Ordering::Relaxed),
            self.rejected_body.load(Ordering::Relaxed),
            self.rejected_amount.load(Ordering::Relaxed),
            self.rate_limited.load(Ordering::Relaxed),
            self.duplicates.load(Ordering::Relaxed),
            self.persistence_errors.load(Ordering::Relaxed),
            self.archive_syncs.load(Ordering::Relaxed),
            self.archive_errors.load(Ordering::Relaxed),
        )
    }
}
