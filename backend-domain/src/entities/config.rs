// Runtime configuration shared across layers

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
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

impl RuntimeConfig {
    pub fn archive_configured(&self) -> bool {
        [
            &self.archive_base_url,
            &self.archive_token,
            &self.archive_workspace,
            &self.archive_collection,
        ]
        .iter()
        .all(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:3210".to_string(),
            archive_base_url: Some("https://archive.example".to_string()),
            archive_token: Some("token".to_string()),
            archive_workspace: Some("home".to_string()),
            archive_collection: Some("lifelog".to_string()),
            rate_window_seconds: 60,
            rate_max_requests: 10,
            dedupe_window_seconds: 5,
            retention_seconds: 3600,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
        }
    }

    #[test]
    fn archive_configured_requires_all_locators() {
        assert!(base_config().archive_configured());

        let mut missing = base_config();
        missing.archive_token = None;
        assert!(!missing.archive_configured());

        let mut blank = base_config();
        blank.archive_collection = Some("   ".to_string());
        assert!(!blank.archive_configured());
    }
}
