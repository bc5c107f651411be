//! Alertmanager API v2 Wire Types
//!
//! These mirror the remote service's JSON schema and never leave the crate:
//! every payload is converted into the `alerting` model before it is returned.

use alerting::{
    AlertGroup, AlertState, AlertStatus, AlertingConfig, AlertmanagerError, ClusterStatus,
    GettableAlert, GettableSilence, GettableStatus, Integration, LabelSet, Matcher, PeerStatus,
    PostableAlert, PostableSilence, Receiver, Silence, SilenceState, VersionInfo,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireMatcher {
    pub name: String,
    pub value: String,
    pub is_regex: bool,
    #[serde(default = "default_true")]
    pub is_equal: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePostableSilence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub matchers: Vec<WireMatcher>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_by: String,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePostSilenceResponse {
    #[serde(rename = "silenceID")]
    pub silence_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSilenceStatus {
    pub state: SilenceState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireGettableSilence {
    pub id: String,
    pub status: WireSilenceStatus,
    pub updated_at: DateTime<Utc>,
    pub matchers: Vec<WireMatcher>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePostableAlert {
    pub labels: LabelSet,
    #[serde(skip_serializing_if = "LabelSet::is_empty")]
    pub annotations: LabelSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(rename = "generatorURL", skip_serializing_if = "Option::is_none")]
    pub generator_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireAlertStatus {
    pub state: AlertState,
    #[serde(default)]
    pub silenced_by: Vec<String>,
    #[serde(default)]
    pub inhibited_by: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireReceiverName {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireGettableAlert {
    pub fingerprint: String,
    #[serde(default)]
    pub labels: LabelSet,
    #[serde(default)]
    pub annotations: LabelSet,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub receivers: Vec<WireReceiverName>,
    pub status: WireAlertStatus,
    #[serde(default, rename = "generatorURL")]
    pub generator_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireAlertGroup {
    #[serde(default)]
    pub labels: LabelSet,
    pub receiver: WireReceiverName,
    #[serde(default)]
    pub alerts: Vec<WireGettableAlert>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireIntegration {
    pub name: String,
    #[serde(default)]
    pub send_resolved: bool,
    #[serde(default)]
    pub last_notify_attempt: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_notify_attempt_duration: Option<String>,
    #[serde(default)]
    pub last_notify_attempt_error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireReceiver {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub integrations: Vec<WireIntegration>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePeerStatus {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireClusterStatus {
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub peers: Vec<WirePeerStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireStatusConfig {
    #[serde(default)]
    pub original: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireVersionInfo {
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub build_user: String,
    #[serde(default)]
    pub go_version: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireStatus {
    pub cluster: WireClusterStatus,
    #[serde(default)]
    pub config: WireStatusConfig,
    pub uptime: DateTime<Utc>,
    #[serde(default)]
    pub version_info: WireVersionInfo,
}

impl From<&Matcher> for WireMatcher {
    fn from(m: &Matcher) -> Self {
        Self {
            name: m.name.clone(),
            value: m.value.clone(),
            is_regex: m.is_regex,
            is_equal: m.is_equal,
        }
    }
}

impl From<WireMatcher> for Matcher {
    fn from(m: WireMatcher) -> Self {
        Self {
            name: m.name,
            value: m.value,
            is_regex: m.is_regex,
            is_equal: m.is_equal,
        }
    }
}

impl From<&PostableSilence> for WirePostableSilence {
    fn from(s: &PostableSilence) -> Self {
        Self {
            id: s.id.clone(),
            matchers: s.silence.matchers.iter().map(WireMatcher::from).collect(),
            starts_at: s.silence.starts_at,
            ends_at: s.silence.ends_at,
            created_by: s.silence.created_by.clone(),
            comment: s.silence.comment.clone(),
        }
    }
}

impl From<WireGettableSilence> for GettableSilence {
    fn from(s: WireGettableSilence) -> Self {
        Self {
            id: s.id,
            status: s.status.state,
            updated_at: s.updated_at,
            silence: Silence {
                matchers: s.matchers.into_iter().map(Matcher::from).collect(),
                starts_at: s.starts_at,
                ends_at: s.ends_at,
                created_by: s.created_by,
                comment: s.comment,
            },
        }
    }
}

impl From<&PostableAlert> for WirePostableAlert {
    fn from(a: &PostableAlert) -> Self {
        Self {
            labels: a.labels.clone(),
            annotations: a.annotations.clone(),
            starts_at: a.starts_at,
            ends_at: a.ends_at,
            generator_url: a.generator_url.clone(),
        }
    }
}

impl From<WireGettableAlert> for GettableAlert {
    fn from(a: WireGettableAlert) -> Self {
        Self {
            fingerprint: a.fingerprint,
            labels: a.labels,
            annotations: a.annotations,
            starts_at: a.starts_at,
            ends_at: a.ends_at,
            updated_at: a.updated_at,
            receivers: a.receivers.into_iter().map(|r| r.name).collect(),
            status: AlertStatus {
                state: a.status.state,
                silenced_by: a.status.silenced_by,
                inhibited_by: a.status.inhibited_by,
            },
            generator_url: a.generator_url,
        }
    }
}

impl From<WireAlertGroup> for AlertGroup {
    fn from(g: WireAlertGroup) -> Self {
        Self {
            labels: g.labels,
            receiver: g.receiver.name,
            alerts: g.alerts.into_iter().map(GettableAlert::from).collect(),
        }
    }
}

impl From<WireReceiver> for Receiver {
    fn from(r: WireReceiver) -> Self {
        Self {
            name: r.name,
            active: r.active,
            integrations: r
                .integrations
                .into_iter()
                .map(|i| Integration {
                    name: i.name,
                    send_resolved: i.send_resolved,
                    last_notify_attempt: i.last_notify_attempt,
                    last_notify_attempt_duration: i.last_notify_attempt_duration,
                    last_notify_attempt_error: i.last_notify_attempt_error,
                })
                .collect(),
        }
    }
}

impl TryFrom<WireStatus> for GettableStatus {
    type Error = AlertmanagerError;

    fn try_from(s: WireStatus) -> Result<Self, Self::Error> {
        let config = AlertingConfig::parse(&s.config.original).map_err(|e| {
            AlertmanagerError::Decode(format!("status carries an unreadable configuration: {}", e))
        })?;

        Ok(Self {
            cluster: ClusterStatus {
                name: s.cluster.name,
                status: s.cluster.status,
                peers: s
                    .cluster
                    .peers
                    .into_iter()
                    .map(|p| PeerStatus {
                        name: p.name,
                        address: p.address,
                    })
                    .collect(),
            },
            config,
            uptime: s.uptime,
            version_info: VersionInfo {
                branch: s.version_info.branch,
                build_date: s.version_info.build_date,
                build_user: s.version_info.build_user,
                go_version: s.version_info.go_version,
                revision: s.version_info.revision,
                version: s.version_info.version,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receiver_projection_drops_remote_only_fields() {
        let raw = r#"{
            "name": "ops",
            "active": true,
            "tenant": "ignored",
            "integrations": [{
                "name": "email",
                "sendResolved": true,
                "lastNotifyAttemptError": "smtp timeout",
                "internalId": 17
            }]
        }"#;
        let receiver: Receiver = serde_json::from_str::<WireReceiver>(raw).unwrap().into();
        assert_eq!(receiver.name, "ops");
        assert!(receiver.active);
        assert_eq!(receiver.integrations.len(), 1);
        assert_eq!(
            receiver.integrations[0].last_notify_attempt_error.as_deref(),
            Some("smtp timeout")
        );
    }

    #[test]
    fn test_receiver_without_grafana_fields() {
        // Upstream Alertmanager only reports receiver names
        let receiver: Receiver = serde_json::from_str::<WireReceiver>(r#"{"name": "web"}"#)
            .unwrap()
            .into();
        assert!(!receiver.active);
        assert!(receiver.integrations.is_empty());
    }

    #[test]
    fn test_silence_translation() {
        let raw = r#"{
            "id": "6f1e9c3a-3c1f-4b4e-9d7e-1d5b2f6a0c11",
            "status": {"state": "active"},
            "updatedAt": "2024-05-01T10:00:00Z",
            "matchers": [{"name": "team", "value": "db", "isRegex": false}],
            "startsAt": "2024-05-01T10:00:00Z",
            "endsAt": "2024-05-01T12:00:00Z",
            "createdBy": "alice",
            "comment": "maintenance"
        }"#;
        let silence: GettableSilence = serde_json::from_str::<WireGettableSilence>(raw)
            .unwrap()
            .into();
        assert_eq!(silence.status, SilenceState::Active);
        assert_eq!(silence.silence.matchers[0], Matcher::equal("team", "db"));
        assert_eq!(silence.silence.created_by, "alice");
    }

    #[test]
    fn test_status_translation_parses_config() {
        let raw = r#"{
            "cluster": {"name": "01HX", "status": "ready", "peers": [{"name": "01HX", "address": "10.0.0.1:9094"}]},
            "config": {"original": "route:\n  receiver: ops\nreceivers:\n  - name: ops\n"},
            "uptime": "2024-05-01T09:00:00Z",
            "versionInfo": {"branch": "main", "buildDate": "", "buildUser": "", "goVersion": "go1.22", "revision": "abc", "version": "0.27.0"}
        }"#;
        let status = GettableStatus::try_from(serde_json::from_str::<WireStatus>(raw).unwrap()).unwrap();
        assert_eq!(status.cluster.peers.len(), 1);
        assert_eq!(status.version_info.version, "0.27.0");
        assert_eq!(status.config.receivers[0].name, "ops");
        assert_eq!(
            status.config.route.unwrap().receiver.as_deref(),
            Some("ops")
        );
    }

    #[test]
    fn test_status_with_broken_config_is_decode_error() {
        let raw = r#"{
            "cluster": {"status": "disabled"},
            "config": {"original": "route: [unterminated"},
            "uptime": "2024-05-01T09:00:00Z"
        }"#;
        let err = GettableStatus::try_from(serde_json::from_str::<WireStatus>(raw).unwrap()).unwrap_err();
        assert!(matches!(err, AlertmanagerError::Decode(_)));
    }

    #[test]
    fn test_postable_alert_wire_names() {
        let alert = PostableAlert {
            labels: [("alertname".to_string(), "HighLatency".to_string())].into(),
            generator_url: Some("http://grafana/alerting/1".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(WirePostableAlert::from(&alert)).unwrap();
        assert_eq!(json["generatorURL"], "http://grafana/alerting/1");
        assert_eq!(json["labels"]["alertname"], "HighLatency");
        assert!(json.get("annotations").is_none());
    }
}
