//! Common Alertmanager Backend Contract
//!
//! Implemented by in-process engines and by remote adapters alike, so the
//! hosting subsystem can swap one for the other per organization.

use crate::alert::{AlertFilter, AlertGroup, GettableAlert, PostableAlert};
use crate::config::{AlertConfiguration, UserConfig};
use crate::error::AlertmanagerError;
use crate::receiver::{Receiver, TestReceiversRequest, TestReceiversResult, TestTemplatesRequest, TestTemplatesResults};
use crate::silence::{GettableSilence, PostableSilence};
use crate::status::GettableStatus;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional operations a backend may not support yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    TestReceivers,
    TestTemplate,
    ApplyConfig,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::TestReceivers,
        Capability::TestTemplate,
        Capability::ApplyConfig,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::TestReceivers => "testing of receivers",
            Capability::TestTemplate => "testing of templates",
            Capability::ApplyConfig => "applying configuration",
        };
        f.write_str(name)
    }
}

/// Operations every alerting backend exposes
#[async_trait]
pub trait Alertmanager: Send + Sync {
    /// Replace the whole configuration
    async fn save_and_apply_config(&self, config: &UserConfig) -> Result<(), AlertmanagerError>;

    /// Replace the configuration with the backend's default one
    async fn save_and_apply_default_config(&self) -> Result<(), AlertmanagerError>;

    async fn get_status(&self) -> Result<GettableStatus, AlertmanagerError>;

    /// Create or update a silence, returning its ID
    async fn create_silence(&self, silence: &PostableSilence) -> Result<String, AlertmanagerError>;

    async fn delete_silence(&self, silence_id: &str) -> Result<(), AlertmanagerError>;

    async fn get_silence(&self, silence_id: &str) -> Result<GettableSilence, AlertmanagerError>;

    async fn list_silences(&self, filters: &[String]) -> Result<Vec<GettableSilence>, AlertmanagerError>;

    async fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<GettableAlert>, AlertmanagerError>;

    async fn get_alert_groups(&self, filter: &AlertFilter) -> Result<Vec<AlertGroup>, AlertmanagerError>;

    /// Push newly generated alerts
    async fn put_alerts(&self, alerts: &[PostableAlert]) -> Result<(), AlertmanagerError>;

    async fn get_receivers(&self) -> Result<Vec<Receiver>, AlertmanagerError>;

    async fn test_receivers(
        &self,
        request: &TestReceiversRequest,
    ) -> Result<TestReceiversResult, AlertmanagerError>;

    async fn test_template(
        &self,
        request: &TestTemplatesRequest,
    ) -> Result<TestTemplatesResults, AlertmanagerError>;

    /// Apply a stored configuration record directly
    async fn apply_config(&self, config: &AlertConfiguration) -> Result<(), AlertmanagerError>;

    /// Release resources and wait for in-flight work
    async fn stop_and_wait(&self);

    fn ready(&self) -> bool;

    fn org_id(&self) -> i64;

    /// Hash of the configuration currently applied
    fn config_hash(&self) -> [u8; 16];

    /// Whether the optional operation behind `capability` is available
    fn supports(&self, _capability: Capability) -> bool {
        true
    }
}
