use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::RuntimeConfig;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: String,
    pub archive_base_url: Option<String>,
    pub archive_token: Option<String>,
    pub archive_workspace: Option<String>,
    pub archive_collection: Option<String>,
    pub rate_window_seconds: i64,
    pub rate_max_requests: u32,
    pub dedupe_window_seconds: i64,
    pub retention_seconds: i64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3210".to_string(),
            database_path: "./droplog.db".to_string(),
            archive_base_url: None,
            archive_token: None,
            archive_workspace: None,
            archive_collection: None,
            rate_window_seconds: 60,
            rate_max_requests: 10,
            dedupe_window_seconds: 5,
            retention_seconds: 3600,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("DROPLOG_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(url) = &self.archive_base_url {
            if url.trim().is_empty() {
                self.archive_base_url = None;
            }
        }
        if let Some(token) = &self.archive_token {
            if token.trim().is_empty() {
                self.archive_token = None;
            }
        }
        if let Some(workspace) = &self.archive_workspace {
            if workspace.trim().is_empty() {
                self.archive_workspace = None;
            }
        }
        if let Some(collection) = &self.archive_collection {
            if collection.trim().is_empty() {
                self.archive_collection = None;
            }
        }
        if let Some(url) = &mut self.archive_base_url {
            while url.ends_with('/') {
                url.pop();
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.database_path = resolve_path(base, &self.database_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.database_path.trim().is_empty() {
            return Err(anyhow!("database_path must not be empty"));
        }
        if self.rate_window_seconds <= 0 {
            return Err(anyhow!("rate_window_seconds must be greater than 0"));
        }
        if self.dedupe_window_seconds <= 0 {
            return Err(anyhow!("dedupe_window_seconds must be greater than 0"));
        }
        if self.retention_seconds <= 0 {
            return Err(anyhow!("retention_seconds must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            archive_base_url: self.archive_base_url.clone(),
            archive_token: self.archive_token.clone(),
            archive_workspace: self.archive_workspace.clone(),
            archive_collection: self.archive_collection.clone(),
            rate_window_seconds: self.rate_window_seconds,
            rate_max_requests: self.rate_max_requests,
            dedupe_window_seconds: self.dedupe_window_seconds,
            retention_seconds: self.retention_seconds,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("DROPLOG_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("DROPLOG_DATABASE_PATH") {
            self.database_path = value;
        }
        if let Ok(value) = env::var("DROPLOG_ARCHIVE_BASE_URL") {
            self.archive_base_url = Some(value);
        }
        if let Ok(value) = env::var("DROPLOG_ARCHIVE_TOKEN") {
            self.archive_token = Some(value);
        }
        if let Ok(value) = env::var("DROPLOG_ARCHIVE_WORKSPACE") {
            self.archive_workspace = Some(value);
        }
        if let Ok(value) = env::var("DROPLOG_ARCHIVE_COLLECTION") {
            self.archive_collection = Some(value);
        }
        if let Ok(value) = env::var("DROPLOG_RATE_WINDOW_SECONDS") {
            self.rate_window_seconds = value.parse().unwrap_or(self.rate_window_seconds);
        }
        if let Ok(value) = env::var("DROPLOG_RATE_MAX_REQUESTS") {
            self.rate_max_requests = value.parse().unwrap_or(self.rate_max_requests);
        }
        if let Ok(value) = env::var("DROPLOG_DEDUPE_WINDOW_SECONDS") {
            self.dedupe_window_seconds = value.parse().unwrap_or(self.dedupe_window_seconds);
        }
        if let Ok(value) = env::var("DROPLOG_RETENTION_SECONDS") {
            self.retention_seconds = value.parse().unwrap_or(self.retention_seconds);
        }
        if let Ok(value) = env::var("DROPLOG_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("DROPLOG_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
