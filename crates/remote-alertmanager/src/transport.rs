//! Tenant Header and Basic Auth Injection
//!
//! [`TenantAuth`] is a tower middleware around any service that sends
//! `reqwest` requests. Every request leaving through it carries the tenant
//! scope header, plus basic auth credentials when a password is configured.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// `X-Scope-OrgID`, naming the tenant a request belongs to
pub const TENANT_HEADER: &str = "x-scope-orgid";

/// Layer producing [`TenantAuth`] services
#[derive(Clone)]
pub struct TenantAuthLayer {
    tenant: HeaderValue,
    authorization: Option<HeaderValue>,
}

impl TenantAuthLayer {
    /// Prepare the header values for `tenant_id`
    ///
    /// Credentials are attached only when both the tenant ID and the
    /// password are non-empty; the tenant ID is the basic auth username.
    pub fn new(tenant_id: &str, basic_auth_password: Option<&str>) -> Result<Self, InvalidHeaderValue> {
        let tenant = HeaderValue::from_str(tenant_id)?;

        let authorization = match basic_auth_password {
            Some(password) if !tenant_id.is_empty() && !password.is_empty() => {
                let credentials = STANDARD.encode(format!("{}:{}", tenant_id, password));
                let mut value = HeaderValue::from_str(&format!("Basic {}", credentials))?;
                value.set_sensitive(true);
                Some(value)
            }
            _ => None,
        };

        Ok(Self { tenant, authorization })
    }

    /// Whether requests will carry basic auth credentials
    pub fn has_credentials(&self) -> bool {
        self.authorization.is_some()
    }
}

impl<S> Layer<S> for TenantAuthLayer {
    type Service = TenantAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenantAuth {
            inner,
            tenant: self.tenant.clone(),
            authorization: self.authorization.clone(),
        }
    }
}

/// Service stamping tenant and auth headers before delegating to `inner`
#[derive(Clone)]
pub struct TenantAuth<S> {
    inner: S,
    tenant: HeaderValue,
    authorization: Option<HeaderValue>,
}

impl<S> TenantAuth<S> {
    /// Wrapped service
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S> Service<reqwest::Request> for TenantAuth<S>
where
    S: Service<reqwest::Request>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: reqwest::Request) -> Self::Future {
        let headers = request.headers_mut();
        headers.insert(TENANT_HEADER, self.tenant.clone());
        if let Some(authorization) = &self.authorization {
            headers.insert(AUTHORIZATION, authorization.clone());
        }
        self.inner.call(request)
    }
}
