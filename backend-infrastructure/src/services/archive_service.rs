use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, ETAG, IF_MATCH};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use backend_application::Metrics;
use backend_domain::ports::ArchiveService;
use backend_domain::services::admission;
use backend_domain::{EventRecord, RuntimeConfig};

pub struct HttpArchiveService {
    metrics: Arc<Metrics>,
}

impl HttpArchiveService {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl ArchiveService for HttpArchiveService {
    fn spawn_sync(&self, config: RuntimeConfig, event: EventRecord) {
        if !config.archive_configured() {
            debug!("archive not configured, skipping sync for event {}", event.id);
            return;
        }
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            match sync_event(&config, &event).await {
                Ok(()) => metrics.record_archive_sync(),
                Err(err) => {
                    metrics.record_archive_error();
                    warn!("archive sync failed for event {}: {}", event.id, err);
                }
            }
        });
    }

    async fn check_archive_target(&self, config: &RuntimeConfig) -> Result<()> {
        check_archive_target(config).await
    }
}

pub async fn check_archive_target(config: &RuntimeConfig) -> Result<()> {
    let target = resolve_archive_target(config)?;
    let month = admission::month_key(chrono::Utc::now().timestamp());
    let url = document_url(&target, &month);
    let client = build_client(config)?;
    let response = client
        .get(&url)
        .header(AUTHORIZATION, format!("Bearer {}", target.token))
        .send()
        .await?;
    // A month with no document yet still proves the target answers.
    if response.status() == StatusCode::NOT_FOUND || response.status().is_success() {
        return Ok(());
    }
    anyhow::bail!("archive responded {}", response.status())
}

async fn sync_event(config: &RuntimeConfig, event: &EventRecord) -> Result<()> {
    let target = resolve_archive_target(config)?;
    let month = admission::month_key(event.created_at);
    let url = document_url(&target, &month);
    let client = build_client(config)?;

    let (mut entries, revision) = fetch_document(&client, &target, &url).await?;
    entries.push(serde_json::to_value(event)?);
    put_document(&client, &target, &url, &entries, revision.as_deref()).await
}

async fn fetch_document(
    client: &Client,
    target: &ArchiveTarget,
    url: &str,
) -> Result<(Vec<serde_json::Value>, Option<String>)> {
    let response = client
        .get(url)
        .header(AUTHORIZATION, format!("Bearer {}", target.token))
        .send()
        .await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Ok((Vec::new(), None));
    }
    let response = response.error_for_status()?;
    let revision = response
        .headers()
        .get(ETAG)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let entries = response.json::<Vec<serde_json::Value>>().await?;
    Ok((entries, revision))
}

async fn put_document(
    client: &Client,
    target: &ArchiveTarget,
    url: &str,
    entries: &[serde_json::Value],
    revision: Option<&str>,
) -> Result<()> {
    let body = serde_json::to_string_pretty(entries)?;
    let mut request = client
        .put(url)
        .header(AUTHORIZATION, format!("Bearer {}", target.token))
        .header("Content-Type", "application/json")
        .body(body);
    if let Some(revision) = revision {
        request = request.header(IF_MATCH, revision);
    }
    let response = request.send().await?;
    if response.status() == StatusCode::PRECONDITION_FAILED {
        anyhow::bail!("document revision went stale, sync abandoned");
    }
    response.error_for_status()?;
    Ok(())
}

fn build_client(config: &RuntimeConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
        .build()?;
    Ok(client)
}

#[derive(Debug)]
struct ArchiveTarget {
    base_url: String,
    token: String,
    workspace: String,
    collection: String,
}

fn resolve_archive_target(config: &RuntimeConfig) -> Result<ArchiveTarget> {
    Ok(ArchiveTarget {
        base_url: required(&config.archive_base_url, "archive_base_url")?,
        token: required(&config.archive_token, "archive_token")?,
        workspace: required(&config.archive_workspace, "archive_workspace")?,
        collection: required(&config.archive_collection, "archive_collection")?,
    })
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => anyhow::bail!("{} not configured", name),
    }
}

fn document_url(target: &ArchiveTarget, month: &str) -> String {
    format!(
        "{}/api/{}/{}/events/{}.json",
        target.base_url.trim_end_matches('/'),
        target.workspace,
        target.collection,
        month
    )
}
