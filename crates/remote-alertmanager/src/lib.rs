//! Remote Alertmanager Backend
//!
//! Implements [`alerting::Alertmanager`] on top of an externally hosted,
//! multi-tenant Alertmanager (for example Mimir). Every request carries the
//! tenant scope header and, when configured, basic auth credentials.
//!
//! Calls are single attempts: there are no retries, backoff or circuit
//! breaking. Dropping a returned future aborts its in-flight request, so a
//! caller wanting a deadline wraps the call in `tokio::time::timeout`.

mod api;
mod backend;
mod client;
mod config;
mod sync;
mod transport;
mod wire;

pub use api::API_BASE_PATH;
pub use client::RemoteAlertmanager;
pub use config::RemoteAlertmanagerConfig;
pub use transport::{TenantAuth, TenantAuthLayer, TENANT_HEADER};
