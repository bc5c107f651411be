//! Alerting Configuration Documents
//!
//! A [`UserConfig`] is the unit of every apply operation: it always replaces
//! the whole remote configuration. Integration settings inside receivers, and
//! any keys the typed model does not name (`time_intervals`, legacy `match`
//! and `source_match` forms, ...), are kept as opaque YAML values so that
//! documents round-trip without loss.

use crate::error::AlertmanagerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Configuration applied when an organization has none of its own
pub const DEFAULT_CONFIG: &str = r#"{
  "alertmanager_config": {
    "route": {
      "receiver": "grafana-default-email",
      "group_by": ["grafana_folder", "alertname"]
    },
    "receivers": [{
      "name": "grafana-default-email",
      "grafana_managed_receiver_configs": [{
        "uid": "",
        "name": "email receiver",
        "type": "email",
        "isDefault": true,
        "settings": {
          "addresses": "<example@email.com>"
        }
      }]
    }]
  }
}
"#;

/// Full configuration pushed to a backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Template file name to template body
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub template_files: BTreeMap<String, String>,
    /// Routing tree, receivers and inhibition rules
    pub alertmanager_config: AlertingConfig,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Alertmanager routing configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inhibit_rules: Vec<InhibitRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,
    #[serde(default)]
    pub receivers: Vec<ReceiverConfig>,
    /// `time_intervals` and other keys passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Node of the routing tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_matchers: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<String>,
    #[serde(default, rename = "continue", skip_serializing_if = "std::ops::Not::not")]
    pub continue_matching: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
    /// `match`, `match_re`, `active_time_intervals`, ...
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Route {
    /// Visit this route and every nested route, depth first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Route)) {
        visit(self);
        for child in &self.routes {
            child.walk(visit);
        }
    }
}

/// Inhibition rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InhibitRule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_matchers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_matchers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equal: Vec<String>,
    /// `source_match`, `target_match` and their `_re` variants
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Named receiver and its integration blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    pub name: String,
    /// `email_configs`, `webhook_configs`, `grafana_managed_receiver_configs`, ...
    #[serde(flatten)]
    pub integrations: BTreeMap<String, serde_yaml::Value>,
}

impl UserConfig {
    /// Parse and validate a configuration document (YAML or JSON)
    pub fn load(raw: &str) -> Result<Self, AlertmanagerError> {
        let config: UserConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        debug!(
            "Loaded alerting configuration with {} receivers",
            config.alertmanager_config.receivers.len()
        );
        Ok(config)
    }

    /// Render the document in the wire format
    pub fn to_yaml(&self) -> Result<String, AlertmanagerError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check that the routing tree only references defined receivers
    pub fn validate(&self) -> Result<(), AlertmanagerError> {
        self.alertmanager_config.validate()
    }
}

impl AlertingConfig {
    /// Parse a bare Alertmanager configuration without validating it
    pub fn parse(raw: &str) -> Result<Self, AlertmanagerError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), AlertmanagerError> {
        let mut names = HashSet::new();
        for receiver in &self.receivers {
            if receiver.name.is_empty() {
                return Err(AlertmanagerError::Config(
                    "receiver name must not be empty".to_string(),
                ));
            }
            if !names.insert(receiver.name.as_str()) {
                return Err(AlertmanagerError::Config(format!(
                    "receiver '{}' is defined more than once",
                    receiver.name
                )));
            }
        }

        let route = self
            .route
            .as_ref()
            .ok_or_else(|| AlertmanagerError::Config("no route provided".to_string()))?;

        if route.receiver.as_deref().map_or(true, str::is_empty) {
            return Err(AlertmanagerError::Config(
                "root route must specify a default receiver".to_string(),
            ));
        }

        let mut missing = None;
        route.walk(&mut |node| {
            if missing.is_some() {
                return;
            }
            if let Some(name) = node.receiver.as_deref() {
                if !names.contains(name) {
                    missing = Some(name.to_string());
                }
            }
        });

        match missing {
            Some(name) => Err(AlertmanagerError::Config(format!(
                "undefined receiver '{}' used in route",
                name
            ))),
            None => Ok(()),
        }
    }
}

/// Stored configuration record, as kept by the hosting subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfiguration {
    pub id: i64,
    pub org_id: i64,
    /// Raw configuration text
    pub alertmanager_configuration: String,
    pub configuration_hash: String,
    pub created_at: DateTime<Utc>,
    /// Whether this record holds the default configuration
    pub default: bool,
}
