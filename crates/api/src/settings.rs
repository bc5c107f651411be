//! Gateway Settings
//!
//! Layered from an optional configuration file and `GATEWAY__*` environment
//! variables, e.g. `GATEWAY__SERVER__LISTEN_ADDR=127.0.0.1:9000`.

use crate::rate_limit::RateLimitConfig;
use config::{Config, ConfigError, Environment, File, FileFormat};
use remote_alertmanager::RemoteAlertmanagerConfig;
use serde::Deserialize;

/// Configuration file used when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "gateway";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub log: LogSettings,
    /// Remote backend per organization
    #[serde(default)]
    pub orgs: Vec<OrgSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `trace`, `debug`, `info`, `warn` or `error`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrgSettings {
    pub org_id: i64,
    #[serde(flatten)]
    pub remote: RemoteAlertmanagerConfig,
    /// Push the default configuration when the gateway starts
    #[serde(default)]
    pub apply_default_on_start: bool,
}

impl Settings {
    /// Load from `path` (or `GATEWAY_CONFIG`, or `gateway.*`) plus the environment
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let path = path
            .map(str::to_string)
            .or_else(|| std::env::var("GATEWAY_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("GATEWAY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse settings from TOML text
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(settings.log.level, "info");
        assert!(settings.orgs.is_empty());
    }

    #[test]
    fn test_org_backends() {
        let raw = r#"
[server]
listen_addr = "127.0.0.1:9000"

[server.rate_limit]
per_second = 1
burst_size = 20

[log]
level = "debug"
json = true

[[orgs]]
org_id = 1
url = "https://mimir.example/api/v1/alerts"
tenant_id = "tenant-1"
basic_auth_password = "secret"
apply_default_on_start = true

[[orgs]]
org_id = 2
url = "https://mimir.example/api/v1/alerts"
tenant_id = "tenant-2"
"#;
        let settings = Settings::from_toml(raw).unwrap();
        assert_eq!(settings.server.listen_addr, "127.0.0.1:9000");
        assert_eq!(settings.server.rate_limit.burst_size, 20);
        assert!(settings.log.json);
        assert_eq!(settings.orgs.len(), 2);

        let first = &settings.orgs[0];
        assert_eq!(first.remote.tenant_id, "tenant-1");
        assert_eq!(first.remote.basic_auth_password.as_deref(), Some("secret"));
        assert!(first.apply_default_on_start);

        let second = &settings.orgs[1];
        assert!(second.remote.basic_auth_password.is_none());
        assert_eq!(second.remote.default_config, alerting::DEFAULT_CONFIG);
    }
}
