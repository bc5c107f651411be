//! Alertmanager Error Types

use crate::backend::Capability;
use thiserror::Error;

/// Boxed source error used for transport-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by any Alertmanager backend
#[derive(Debug, Error)]
pub enum AlertmanagerError {
    /// Endpoint URL could not be used to build a client
    #[error("Invalid Alertmanager URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network, timeout or cancellation failure, passed through unchanged
    #[error(transparent)]
    Transport(BoxError),

    /// Outbound request could not be built
    #[error("error creating request: {0}")]
    Request(#[source] BoxError),

    /// Response body could not be read
    #[error("error reading response body: {0}")]
    ReadBody(#[source] BoxError),

    /// Remote has no configuration for this tenant
    #[error("config not found")]
    ConfigNotFound,

    /// Remote rejected a configuration push
    #[error("setting config failed with status code {status} and error {body}")]
    ApplyFailed { status: u16, body: String },

    /// Remote answered with a non-success status
    #[error("unexpected status code {status} from Alertmanager: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Remote payload did not match the expected shape
    #[error("Failed to decode Alertmanager response: {0}")]
    Decode(String),

    /// Configuration document could not be parsed, validated or rendered
    #[error("Invalid alerting configuration: {0}")]
    Config(String),

    /// Silence ID is not a UUID
    #[error("Invalid silence ID '{0}': must be a UUID")]
    InvalidSilenceId(String),

    /// Silence does not exist
    #[error("Silence {0} not found")]
    SilenceNotFound(String),

    /// Backend does not support this capability yet
    #[error("{0} not implemented")]
    NotImplemented(Capability),

    /// No backend registered for the organization
    #[error("No Alertmanager registered for org {0}")]
    OrgNotFound(i64),
}

impl AlertmanagerError {
    /// Wrap a transport failure without altering it
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AlertmanagerError::Transport(Box::new(err))
    }

    /// Whether the caller should fall back to a default configuration
    pub fn is_config_not_found(&self) -> bool {
        matches!(self, AlertmanagerError::ConfigNotFound)
    }

    /// Whether the failure comes from an unsupported capability
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, AlertmanagerError::NotImplemented(_))
    }
}

impl From<serde_yaml::Error> for AlertmanagerError {
    fn from(err: serde_yaml::Error) -> Self {
        AlertmanagerError::Config(err.to_string())
    }
}
