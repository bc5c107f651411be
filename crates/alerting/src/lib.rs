//! Alerting Domain
//!
//! Provides the alerting domain model, the [`Alertmanager`] backend contract
//! shared by local engines and remote adapters, and a per-organization
//! backend registry.

mod alert;
mod backend;
mod config;
mod error;
mod receiver;
mod registry;
mod silence;
mod status;

pub use alert::{AlertFilter, AlertGroup, AlertState, AlertStatus, GettableAlert, LabelSet, PostableAlert};
pub use backend::{Alertmanager, Capability};
pub use config::{
    AlertConfiguration, AlertingConfig, InhibitRule, ReceiverConfig, Route, UserConfig,
    DEFAULT_CONFIG,
};
pub use error::{AlertmanagerError, BoxError};
pub use receiver::{
    Integration, Receiver, TemplateError, TemplateResult, TestReceiverResult,
    TestReceiversRequest, TestReceiversResult, TestTemplatesRequest, TestTemplatesResults,
};
pub use registry::OrgRegistry;
pub use silence::{GettableSilence, Matcher, PostableSilence, Silence, SilenceState};
pub use status::{ClusterStatus, GettableStatus, PeerStatus, VersionInfo};
