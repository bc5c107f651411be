//! Typed Client for the Remote Alertmanager API v2
//!
//! One method per remote resource. Requests go through the tenant-aware
//! transport; responses are status-checked and decoded into wire types.

use crate::transport::TenantAuth;
use crate::wire::{
    WireAlertGroup, WireGettableAlert, WireGettableSilence, WirePostSilenceResponse,
    WirePostableAlert, WirePostableSilence, WireReceiver, WireStatus,
};
use alerting::{AlertFilter, AlertmanagerError};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tower::ServiceExt;
use tracing::{debug, warn};

/// Base path of the Alertmanager v2 API
pub const API_BASE_PATH: &str = "/api/v2/";

/// Requests and outcome counts per remote operation
const REQUESTS_TOTAL: &str = "remote_alertmanager_requests_total";
const REQUEST_DURATION: &str = "remote_alertmanager_request_duration_seconds";

/// HTTP client carrying the tenant headers
pub(crate) type HttpClient = TenantAuth<reqwest::Client>;

/// Client bound to `<scheme>://<host>/api/v2/`
#[derive(Clone)]
pub(crate) struct AlertmanagerApi {
    base: Url,
    http: HttpClient,
}

impl AlertmanagerApi {
    pub fn new(base: Url, http: HttpClient) -> Self {
        Self { base, http }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub async fn get_status(&self) -> Result<WireStatus, AlertmanagerError> {
        let request = self.request(Method::GET, "status")?.build();
        self.call_json("get_status", request).await
    }

    pub async fn post_silence(
        &self,
        silence: &WirePostableSilence,
    ) -> Result<WirePostSilenceResponse, AlertmanagerError> {
        let request = self.request(Method::POST, "silences")?.json(silence).build();
        self.call_json("create_silence", request).await
    }

    pub async fn get_silence(&self, id: &str) -> Result<WireGettableSilence, AlertmanagerError> {
        let request = self.request(Method::GET, &format!("silence/{}", id))?.build();
        self.call_json("get_silence", request)
            .await
            .map_err(|e| silence_not_found(e, id))
    }

    pub async fn delete_silence(&self, id: &str) -> Result<(), AlertmanagerError> {
        let request = self.request(Method::DELETE, &format!("silence/{}", id))?.build();
        self.call("delete_silence", request)
            .await
            .map(drop)
            .map_err(|e| silence_not_found(e, id))
    }

    pub async fn get_silences(&self, filters: &[String]) -> Result<Vec<WireGettableSilence>, AlertmanagerError> {
        let query: Vec<(&str, &str)> = filters.iter().map(|f| ("filter", f.as_str())).collect();
        let request = self.request(Method::GET, "silences")?.query(&query).build();
        self.call_json("list_silences", request).await
    }

    pub async fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<WireGettableAlert>, AlertmanagerError> {
        let request = self
            .request(Method::GET, "alerts")?
            .query(&filter_query(filter))
            .build();
        self.call_json("get_alerts", request).await
    }

    pub async fn get_alert_groups(&self, filter: &AlertFilter) -> Result<Vec<WireAlertGroup>, AlertmanagerError> {
        let request = self
            .request(Method::GET, "alerts/groups")?
            .query(&filter_query(filter))
            .build();
        self.call_json("get_alert_groups", request).await
    }

    pub async fn post_alerts(&self, alerts: &[WirePostableAlert]) -> Result<(), AlertmanagerError> {
        let request = self.request(Method::POST, "alerts")?.json(alerts).build();
        self.call("put_alerts", request).await.map(drop)
    }

    pub async fn get_receivers(&self) -> Result<Vec<WireReceiver>, AlertmanagerError> {
        let request = self.request(Method::GET, "receivers")?.build();
        self.call_json("get_receivers", request).await
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, AlertmanagerError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| AlertmanagerError::Request(Box::new(e)))?;
        Ok(self.http.inner().request(method, url))
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::Result<reqwest::Request>,
    ) -> Result<T, AlertmanagerError> {
        let body = self.call(operation, request).await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!("Undecodable {} response from Alertmanager: {}", operation, e);
            AlertmanagerError::Decode(format!("{}: {}", operation, e))
        })
    }

    /// Send one request, returning the body of a 2xx response
    async fn call(
        &self,
        operation: &'static str,
        request: reqwest::Result<reqwest::Request>,
    ) -> Result<Vec<u8>, AlertmanagerError> {
        let request = request.map_err(|e| AlertmanagerError::Request(Box::new(e)))?;
        debug!("Alertmanager {} {} ({})", request.method(), request.url(), operation);

        let started = Instant::now();
        let result = send(&self.http, request).await;
        metrics::histogram!(REQUEST_DURATION, "operation" => operation)
            .record(started.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(_) => "success",
            Err(AlertmanagerError::UnexpectedStatus { .. }) => "status",
            Err(_) => "error",
        };
        metrics::counter!(REQUESTS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);

        result
    }
}

/// Send through the tenant-aware client and read the full body
pub(crate) async fn send(http: &HttpClient, request: reqwest::Request) -> Result<Vec<u8>, AlertmanagerError> {
    let (status, body) = send_raw(http, request).await?;
    if !status.is_success() {
        return Err(AlertmanagerError::UnexpectedStatus {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(body)
}

/// Send and read the full body whatever the status
pub(crate) async fn send_raw(
    http: &HttpClient,
    request: reqwest::Request,
) -> Result<(StatusCode, Vec<u8>), AlertmanagerError> {
    let response = http
        .clone()
        .oneshot(request)
        .await
        .map_err(AlertmanagerError::transport)?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| AlertmanagerError::ReadBody(Box::new(e)))?;
    Ok((status, body.to_vec()))
}

fn silence_not_found(err: AlertmanagerError, id: &str) -> AlertmanagerError {
    match err {
        AlertmanagerError::UnexpectedStatus { status: 404, .. } => {
            AlertmanagerError::SilenceNotFound(id.to_string())
        }
        other => other,
    }
}

fn filter_query(filter: &AlertFilter) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("active", filter.active.to_string()),
        ("silenced", filter.silenced.to_string()),
        ("inhibited", filter.inhibited.to_string()),
    ];
    query.extend(filter.matchers.iter().map(|m| ("filter", m.clone())));
    if let Some(receiver) = &filter.receiver {
        query.push(("receiver", receiver.clone()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_defaults() {
        let query = filter_query(&AlertFilter::default());
        assert_eq!(
            query,
            vec![
                ("active", "true".to_string()),
                ("silenced", "true".to_string()),
                ("inhibited", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_query_matchers_and_receiver() {
        let filter = AlertFilter {
            silenced: false,
            matchers: vec!["severity=\"critical\"".to_string(), "team=~\"db|ops\"".to_string()],
            receiver: Some("pager".to_string()),
            ..Default::default()
        };
        let query = filter_query(&filter);
        assert_eq!(query[1], ("silenced", "false".to_string()));
        assert_eq!(query.iter().filter(|(k, _)| *k == "filter").count(), 2);
        assert_eq!(query.last().unwrap(), &("receiver", "pager".to_string()));
    }

    #[test]
    fn test_silence_404_mapped() {
        let err = silence_not_found(
            AlertmanagerError::UnexpectedStatus { status: 404, body: String::new() },
            "abc",
        );
        assert!(matches!(err, AlertmanagerError::SilenceNotFound(id) if id == "abc"));

        let err = silence_not_found(
            AlertmanagerError::UnexpectedStatus { status: 500, body: "boom".to_string() },
            "abc",
        );
        assert!(matches!(err, AlertmanagerError::UnexpectedStatus { status: 500, .. }));
    }
}
