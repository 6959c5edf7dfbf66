use sha2::{Digest, Sha256};
use tracing::warn;

use backend_domain::services::admission;
use backend_domain::{CallerIdentity, EventReceipt, EventRecord, EventSubmission};

use crate::{AppError, AppState};

pub async fn record_event(
    state: &AppState,
    event_type: &str,
    submission: EventSubmission,
    caller: CallerIdentity,
) -> Result<EventReceipt, AppError> {
    let amount_oz = match admission::resolve_amount(submission.amount_oz) {
        Ok(amount) => amount,
        Err(err) => {
            state.metrics.record_amount_rejection();
            return Err(AppError::BadRequest(err.to_string()));
        }
    };

    let now = state.clock.now_secs();
    let rate_window = admission::window_start(now, state.config.rate_window_seconds);
    let admitted = match state
        .rate_repo
        .try_increment(&caller.address, rate_window, state.config.rate_max_requests)
        .await
    {
        Ok(admitted) => admitted,
        Err(err) => {
            state.metrics.record_persistence_error();
            return Err(AppError::Internal(err));
        }
    };
    if !admitted {
        state.metrics.record_rate_limited();
        warn!("rate limit exceeded for {}", caller.address);
        return Err(AppError::RateLimited);
    }

    let dedupe_window = admission::window_start(now, state.config.dedupe_window_seconds);
    let digest = idempotency_digest(&caller.address, amount_oz, dedupe_window);
    let fresh = match state
        .idempotency_repo
        .try_admit(&digest, now, state.config.dedupe_window_seconds)
        .await
    {
        Ok(fresh) => fresh,
        Err(err) => {
            state.metrics.record_persistence_error();
            return Err(AppError::Internal(err));
        }
    };
    if !fresh {
        state.metrics.record_duplicate();
        return Err(AppError::Duplicate);
    }

    let event = EventRecord::create(event_type, amount_oz, submission, caller, now);
    if let Err(err) = state.event_repo.insert_event(&event).await {
        state.metrics.record_persistence_error();
        return Err(AppError::Internal(err));
    }
    state.metrics.record_accepted();

    let receipt = EventReceipt::for_event(&event);
    state.archive_service.spawn_sync(state.config.clone(), event);
    spawn_bookkeeping_cleanup(state, now);
    Ok(receipt)
}

// Not a security control; it only catches accidental double-submits.
fn idempotency_digest(address: &str, amount_oz: f64, window_start: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{address}|{amount_oz}|{window_start}").as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

// Advisory; admission never depends on cleanup.
fn spawn_bookkeeping_cleanup(state: &AppState, now: i64) {
    let cutoff = now - state.config.retention_seconds;
    let rate_repo = state.rate_repo.clone();
    let idempotency_repo = state.idempotency_repo.clone();
    tokio::spawn(async move {
        if let Err(err) = rate_repo.delete_older_than(cutoff).await {
            warn!("rate counter cleanup failed: {}", err);
        }
        if let Err(err) = idempotency_repo.delete_older_than(cutoff).await {
            warn!("idempotency record cleanup failed: {}", err);
        }
    });
}
