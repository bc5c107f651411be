//! Alerts and Alert Groups

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label or annotation set
pub type LabelSet = BTreeMap<String, String>;

/// Newly generated alert pushed to a backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostableAlert {
    pub labels: LabelSet,
    #[serde(default)]
    pub annotations: LabelSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_url: Option<String>,
}

/// Processing state of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    Unprocessed,
    Active,
    Suppressed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    pub state: AlertState,
    /// IDs of silences muting the alert
    #[serde(default)]
    pub silenced_by: Vec<String>,
    /// Fingerprints of alerts inhibiting this one
    #[serde(default)]
    pub inhibited_by: Vec<String>,
}

/// Alert as reported by a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GettableAlert {
    pub fingerprint: String,
    pub labels: LabelSet,
    pub annotations: LabelSet,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Names of the receivers the alert is routed to
    pub receivers: Vec<String>,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_url: Option<String>,
}

/// Alerts grouped under one receiver and label set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertGroup {
    pub labels: LabelSet,
    pub receiver: String,
    pub alerts: Vec<GettableAlert>,
}

/// Selection applied when listing alerts or alert groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertFilter {
    /// Include active alerts
    pub active: bool,
    /// Include silenced alerts
    pub silenced: bool,
    /// Include inhibited alerts
    pub inhibited: bool,
    /// Label matchers such as `severity="critical"`
    #[serde(rename = "filter")]
    pub matchers: Vec<String>,
    /// Receiver name regex
    pub receiver: Option<String>,
}

impl Default for AlertFilter {
    fn default() -> Self {
        Self {
            active: true,
            silenced: true,
            inhibited: true,
            matchers: Vec::new(),
            receiver: None,
        }
    }
}
