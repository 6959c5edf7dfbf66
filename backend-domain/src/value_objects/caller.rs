// Caller identity value object

// Neither field is verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub address: String,
    pub agent: Option<String>,
}

impl CallerIdentity {
    pub fn anonymous() -> Self {
        Self {
            address: "unknown".to_string(),
            agent: None,
        }
    }
}
