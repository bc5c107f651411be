//! Configuration Push
//!
//! The remote configuration is replaced as a whole: the document is rendered
//! to YAML and posted to the configured URL in a single request.

use crate::api::send_raw;
use crate::client::RemoteAlertmanager;
use alerting::{AlertmanagerError, UserConfig};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

impl RemoteAlertmanager {
    /// Push `config` to the remote service
    ///
    /// Succeeds only on `201 Created`. `404` yields
    /// [`AlertmanagerError::ConfigNotFound`] so callers can fall back to the
    /// default configuration; any other status carries the response body.
    pub(crate) async fn push_config(&self, config: &UserConfig) -> Result<(), AlertmanagerError> {
        let data = config.to_yaml()?;

        let request = self
            .http
            .inner()
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/yaml")
            .body(data)
            .build()
            .map_err(|e| AlertmanagerError::Request(Box::new(e)))?;

        debug!("Pushing configuration for org {} to {}", self.org_id, self.url);
        let (status, body) = send_raw(&self.http, request).await?;

        match status {
            StatusCode::CREATED => {
                info!("Applied configuration for org {} (tenant '{}')", self.org_id, self.tenant_id);
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                warn!("Remote Alertmanager has no configuration endpoint for org {}", self.org_id);
                Err(AlertmanagerError::ConfigNotFound)
            }
            other => {
                let body = String::from_utf8_lossy(&body).into_owned();
                warn!(
                    "Configuration push for org {} failed with status {}: {}",
                    self.org_id, other, body
                );
                Err(AlertmanagerError::ApplyFailed {
                    status: other.as_u16(),
                    body,
                })
            }
        }
    }

    /// Parse the stored default configuration and push it
    pub(crate) async fn push_default_config(&self) -> Result<(), AlertmanagerError> {
        let config = UserConfig::load(&self.default_config).map_err(|e| {
            warn!("Default configuration for org {} is invalid: {}", self.org_id, e);
            e
        })?;
        self.push_config(&config).await
    }
}
