//! Receivers and Receiver/Template Testing

use crate::alert::PostableAlert;
use crate::config::ReceiverConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named notification destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub name: String,
    pub active: bool,
    pub integrations: Vec<Integration>,
}

/// Single notification endpoint of a receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub name: String,
    pub send_resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_notify_attempt: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_notify_attempt_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_notify_attempt_error: Option<String>,
}

/// Receivers to exercise with a synthetic alert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestReceiversRequest {
    #[serde(default)]
    pub alert: Option<PostableAlert>,
    pub receivers: Vec<ReceiverConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReceiversResult {
    pub alert: PostableAlert,
    pub receivers: Vec<TestReceiverResult>,
    pub notified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReceiverResult {
    pub name: String,
    /// Integration name to delivery error, empty on success
    pub errors: Vec<(String, String)>,
}

/// Template to render against sample alerts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestTemplatesRequest {
    pub name: String,
    pub template: String,
    #[serde(default)]
    pub alerts: Vec<PostableAlert>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestTemplatesResults {
    pub results: Vec<TemplateResult>,
    pub errors: Vec<TemplateError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateResult {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateError {
    pub name: String,
    pub message: String,
}
