//! Remote Alertmanager Connection Settings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection parameters for one tenant of a remote Alertmanager
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RemoteAlertmanagerConfig {
    /// Endpoint receiving configuration pushes, e.g. `https://am.example/api/v1/alerts`
    pub url: String,
    /// Tenant the organization maps to on the remote side
    pub tenant_id: String,
    /// Basic auth password; the tenant ID is the username
    #[serde(default)]
    pub basic_auth_password: Option<String>,
    /// Configuration (YAML or JSON) applied when falling back to defaults
    #[serde(default = "default_config")]
    pub default_config: String,
}

fn default_config() -> String {
    alerting::DEFAULT_CONFIG.to_string()
}

impl RemoteAlertmanagerConfig {
    pub fn new(url: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tenant_id: tenant_id.into(),
            basic_auth_password: None,
            default_config: default_config(),
        }
    }

    pub fn with_basic_auth_password(mut self, password: impl Into<String>) -> Self {
        self.basic_auth_password = Some(password.into());
        self
    }

    pub fn with_default_config(mut self, default_config: impl Into<String>) -> Self {
        self.default_config = default_config.into();
        self
    }
}

impl fmt::Debug for RemoteAlertmanagerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteAlertmanagerConfig")
            .field("url", &self.url)
            .field("tenant_id", &self.tenant_id)
            .field(
                "basic_auth_password",
                &self.basic_auth_password.as_ref().map(|_| "<redacted>"),
            )
            .field("default_config_len", &self.default_config.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let config = RemoteAlertmanagerConfig::new("https://am.example", "t1")
            .with_basic_auth_password("hunter2");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_default_config_filled_in() {
        let config: RemoteAlertmanagerConfig =
            serde_json::from_str(r#"{"url": "https://am.example", "tenant_id": "t1"}"#).unwrap();
        assert_eq!(config.default_config, alerting::DEFAULT_CONFIG);
        assert!(config.basic_auth_password.is_none());
    }
}
