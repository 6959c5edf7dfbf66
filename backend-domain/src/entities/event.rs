// Event entity
// Represents one durably recorded life-logging event

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::CallerIdentity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_oz: Option<f64>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_agent: Option<String>,
}

impl EventRecord {
    // created_at is server-assigned, never client-supplied.
    pub fn create(
        event_type: &str,
        amount_oz: f64,
        submission: EventSubmission,
        caller: CallerIdentity,
        now_secs: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type: event_type.to_string(),
            amount_oz: Some(amount_oz),
            created_at: now_secs,
            source: submission.source,
            note: submission.note,
            client_agent: caller.agent,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSubmission {
    pub amount_oz: Option<f64>,
    pub source: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventReceipt {
    pub success: bool,
    pub id: String,
    pub amount_oz: f64,
    pub created_at: i64,
}

impl EventReceipt {
    pub fn for_event(event: &EventRecord) -> Self {
        Self {
            success: true,
            id: event.id.clone(),
            amount_oz: event.amount_oz.unwrap_or_default(),
            created_at: event.created_at,
        }
    }
}
