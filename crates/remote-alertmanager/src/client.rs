//! Remote Alertmanager Handle
//!
//! Holds the immutable connection parameters of one (tenant, organization)
//! pair together with the tenant-aware HTTP client built from them.

use crate::api::{AlertmanagerApi, HttpClient, API_BASE_PATH};
use crate::config::RemoteAlertmanagerConfig;
use crate::transport::TenantAuthLayer;
use alerting::AlertmanagerError;
use reqwest::Url;
use tower::Layer;
use tracing::info;

/// Alertmanager backend delegating to a remote, multi-tenant service
pub struct RemoteAlertmanager {
    /// Endpoint receiving configuration pushes
    pub(crate) url: Url,
    pub(crate) tenant_id: String,
    pub(crate) org_id: i64,
    pub(crate) default_config: String,
    pub(crate) http: HttpClient,
    pub(crate) api: AlertmanagerApi,
}

impl RemoteAlertmanager {
    /// Create a handle for `org_id`
    ///
    /// No request is sent; connectivity problems surface on the first call.
    pub fn new(config: RemoteAlertmanagerConfig, org_id: i64) -> Result<Self, AlertmanagerError> {
        let url = parse_url(&config.url)?;

        let auth = TenantAuthLayer::new(&config.tenant_id, config.basic_auth_password.as_deref())
            .map_err(|e| AlertmanagerError::InvalidUrl {
                url: config.url.clone(),
                reason: format!("tenant ID or password is not a valid header value: {}", e),
            })?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AlertmanagerError::Request(Box::new(e)))?;
        let http = auth.layer(client);

        let api = AlertmanagerApi::new(api_base(&url), http.clone());

        info!(
            "Created remote Alertmanager for org {} (tenant '{}', url {}, basic auth: {})",
            org_id,
            config.tenant_id,
            url,
            auth.has_credentials()
        );

        Ok(Self {
            url,
            tenant_id: config.tenant_id,
            org_id,
            default_config: config.default_config,
            http,
            api,
        })
    }

    /// Endpoint receiving configuration pushes
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Base URL of the remote API
    pub fn api_url(&self) -> &Url {
        self.api.base()
    }
}

fn parse_url(raw: &str) -> Result<Url, AlertmanagerError> {
    let invalid = |reason: String| AlertmanagerError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// Same scheme, host and port as `url`, rooted at the API base path
fn api_base(url: &Url) -> Url {
    let mut base = url.clone();
    base.set_path(API_BASE_PATH);
    base.set_query(None);
    base.set_fragment(None);
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_construction() {
        let config = RemoteAlertmanagerConfig::new("https://am.example/api/v2", "t1");
        let am = RemoteAlertmanager::new(config, 7).unwrap();

        assert_eq!(am.org_id, 7);
        assert_eq!(am.tenant_id(), "t1");
        assert_eq!(am.url().as_str(), "https://am.example/api/v2");
        assert_eq!(am.api_url().as_str(), "https://am.example/api/v2/");
    }

    #[test]
    fn test_api_base_keeps_port_and_drops_query() {
        let url = Url::parse("http://127.0.0.1:9009/api/v1/alerts?x=1#frag").unwrap();
        assert_eq!(api_base(&url).as_str(), "http://127.0.0.1:9009/api/v2/");
    }

    #[test]
    fn test_malformed_url_rejected() {
        for raw in ["not a url", "ftp://am.example/", "", "unix:/var/run/am.sock"] {
            let config = RemoteAlertmanagerConfig::new(raw, "t1");
            let err = RemoteAlertmanager::new(config, 1).err().unwrap();
            assert!(
                matches!(err, AlertmanagerError::InvalidUrl { .. }),
                "expected InvalidUrl for {:?}, got {}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_invalid_tenant_rejected() {
        let config = RemoteAlertmanagerConfig::new("https://am.example", "t1\r\n");
        assert!(RemoteAlertmanager::new(config, 1).is_err());
    }
}
