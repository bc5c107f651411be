//! `Alertmanager` Implementation for the Remote Backend

use crate::client::RemoteAlertmanager;
use crate::wire::{WirePostableAlert, WirePostableSilence};
use alerting::{
    AlertConfiguration, AlertFilter, AlertGroup, Alertmanager, AlertmanagerError, Capability,
    GettableAlert, GettableSilence, GettableStatus, PostableAlert, PostableSilence, Receiver,
    TestReceiversRequest, TestReceiversResult, TestTemplatesRequest, TestTemplatesResults,
    UserConfig,
};
use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

/// Operations with no remote counterpart yet
const UNSUPPORTED: [Capability; 3] = [
    Capability::TestReceivers,
    Capability::TestTemplate,
    Capability::ApplyConfig,
];

fn validate_silence_id(id: &str) -> Result<(), AlertmanagerError> {
    Uuid::parse_str(id)
        .map(drop)
        .map_err(|_| AlertmanagerError::InvalidSilenceId(id.to_string()))
}

#[async_trait]
impl Alertmanager for RemoteAlertmanager {
    async fn save_and_apply_config(&self, config: &UserConfig) -> Result<(), AlertmanagerError> {
        self.push_config(config).await
    }

    async fn save_and_apply_default_config(&self) -> Result<(), AlertmanagerError> {
        self.push_default_config().await
    }

    async fn get_status(&self) -> Result<GettableStatus, AlertmanagerError> {
        GettableStatus::try_from(self.api.get_status().await?)
    }

    async fn create_silence(&self, silence: &PostableSilence) -> Result<String, AlertmanagerError> {
        if let Some(id) = &silence.id {
            validate_silence_id(id)?;
        }
        let response = self.api.post_silence(&WirePostableSilence::from(silence)).await?;
        info!("Created silence {} for org {}", response.silence_id, self.org_id);
        Ok(response.silence_id)
    }

    async fn delete_silence(&self, silence_id: &str) -> Result<(), AlertmanagerError> {
        validate_silence_id(silence_id)?;
        self.api.delete_silence(silence_id).await?;
        info!("Deleted silence {} for org {}", silence_id, self.org_id);
        Ok(())
    }

    async fn get_silence(&self, silence_id: &str) -> Result<GettableSilence, AlertmanagerError> {
        validate_silence_id(silence_id)?;
        Ok(self.api.get_silence(silence_id).await?.into())
    }

    async fn list_silences(&self, filters: &[String]) -> Result<Vec<GettableSilence>, AlertmanagerError> {
        let silences = self.api.get_silences(filters).await?;
        Ok(silences.into_iter().map(GettableSilence::from).collect())
    }

    async fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<GettableAlert>, AlertmanagerError> {
        let alerts = self.api.get_alerts(filter).await?;
        Ok(alerts.into_iter().map(GettableAlert::from).collect())
    }

    async fn get_alert_groups(&self, filter: &AlertFilter) -> Result<Vec<AlertGroup>, AlertmanagerError> {
        let groups = self.api.get_alert_groups(filter).await?;
        Ok(groups.into_iter().map(AlertGroup::from).collect())
    }

    async fn put_alerts(&self, alerts: &[PostableAlert]) -> Result<(), AlertmanagerError> {
        let wire: Vec<WirePostableAlert> = alerts.iter().map(WirePostableAlert::from).collect();
        self.api.post_alerts(&wire).await?;
        debug!("Pushed {} alerts for org {}", alerts.len(), self.org_id);
        Ok(())
    }

    async fn get_receivers(&self) -> Result<Vec<Receiver>, AlertmanagerError> {
        let receivers = self.api.get_receivers().await?;
        Ok(receivers.into_iter().map(Receiver::from).collect())
    }

    async fn test_receivers(
        &self,
        _request: &TestReceiversRequest,
    ) -> Result<TestReceiversResult, AlertmanagerError> {
        Err(AlertmanagerError::NotImplemented(Capability::TestReceivers))
    }

    async fn test_template(
        &self,
        _request: &TestTemplatesRequest,
    ) -> Result<TestTemplatesResults, AlertmanagerError> {
        Err(AlertmanagerError::NotImplemented(Capability::TestTemplate))
    }

    async fn apply_config(&self, _config: &AlertConfiguration) -> Result<(), AlertmanagerError> {
        Err(AlertmanagerError::NotImplemented(Capability::ApplyConfig))
    }

    async fn stop_and_wait(&self) {}

    /// Readiness is not probed remotely
    fn ready(&self) -> bool {
        false
    }

    fn org_id(&self) -> i64 {
        self.org_id
    }

    /// Remote state is not hashed
    fn config_hash(&self) -> [u8; 16] {
        [0; 16]
    }

    fn supports(&self, capability: Capability) -> bool {
        !UNSUPPORTED.contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteAlertmanagerConfig;

    fn adapter() -> RemoteAlertmanager {
        // Port 9 (discard) is never contacted by these tests
        let config = RemoteAlertmanagerConfig::new("http://127.0.0.1:9/api/v1/alerts", "t1");
        RemoteAlertmanager::new(config, 42).unwrap()
    }

    #[test]
    fn test_silence_id_validation() {
        assert!(validate_silence_id("6f1e9c3a-3c1f-4b4e-9d7e-1d5b2f6a0c11").is_ok());
        assert!(matches!(
            validate_silence_id("not-a-uuid"),
            Err(AlertmanagerError::InvalidSilenceId(_))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_operations_fail_loudly() {
        let am = adapter();

        let err = am.test_receivers(&TestReceiversRequest::default()).await.unwrap_err();
        assert!(matches!(err, AlertmanagerError::NotImplemented(Capability::TestReceivers)));

        let err = am.test_template(&TestTemplatesRequest::default()).await.unwrap_err();
        assert!(matches!(err, AlertmanagerError::NotImplemented(Capability::TestTemplate)));

        let record = AlertConfiguration {
            id: 1,
            org_id: 42,
            alertmanager_configuration: alerting::DEFAULT_CONFIG.to_string(),
            configuration_hash: String::new(),
            created_at: chrono::Utc::now(),
            default: true,
        };
        let err = am.apply_config(&record).await.unwrap_err();
        assert!(matches!(err, AlertmanagerError::NotImplemented(Capability::ApplyConfig)));
    }

    #[tokio::test]
    async fn test_lifecycle_accessors() {
        let am = adapter();
        assert_eq!(am.org_id(), 42);
        assert!(!am.ready());
        assert_eq!(am.config_hash(), [0u8; 16]);
        am.stop_and_wait().await;
        assert_eq!(am.org_id(), 42);
    }

    #[test]
    fn test_capabilities() {
        let am = adapter();
        for capability in Capability::ALL {
            assert!(!am.supports(capability));
        }
    }
}
