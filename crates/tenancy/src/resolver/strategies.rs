//! Built-in resolution strategies.
//!
//! Each strategy is a leaf: it reads one field of the request through
//! [`RequestContext`] and holds no state besides its configuration.

use std::collections::HashSet;
use std::net::IpAddr;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::request::RequestContext;

use super::{TenantResolver, TenantSource};

/// Default header read by [`HeaderTenantResolver`].
pub const DEFAULT_TENANT_HEADER: &str = "X-Tenant-Id";

/// Default query parameter read by [`QueryStringTenantResolver`].
pub const DEFAULT_TENANT_QUERY_PARAM: &str = "tenant";

/// Default claim type read by [`ClaimTenantResolver`].
pub const DEFAULT_TENANT_CLAIM: &str = "tenant_id";

/// Default route variable read by [`RouteValueTenantResolver`].
pub const DEFAULT_TENANT_ROUTE_KEY: &str = "tenantId";

/// Subdomains that never name a tenant unless the exclusion set is replaced.
pub const DEFAULT_EXCLUDED_SUBDOMAINS: &[&str] = &["www", "api", "app", "mail", "ftp", "admin"];

/// Resolves the tenant from a request header.
#[derive(Debug, Clone)]
pub struct HeaderTenantResolver {
    header_name: String,
}

impl HeaderTenantResolver {
    /// Creates a resolver reading the given header.
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
        }
    }

    /// Returns the header this resolver reads.
    pub fn header_name(&self) -> &str {
        &self.header_name
    }
}

impl Default for HeaderTenantResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT_HEADER)
    }
}

#[async_trait]
impl TenantResolver for HeaderTenantResolver {
    async fn resolve(
        &self,
        request: &dyn RequestContext,
        _cancel: &CancellationToken,
    ) -> Option<String> {
        request.header(&self.header_name).map(String::from)
    }

    fn source(&self) -> TenantSource {
        TenantSource::Header
    }
}

/// Resolves the tenant from a query string parameter.
#[derive(Debug, Clone)]
pub struct QueryStringTenantResolver {
    param_name: String,
}

impl QueryStringTenantResolver {
    /// Creates a resolver reading the given query parameter.
    pub fn new(param_name: impl Into<String>) -> Self {
        Self {
            param_name: param_name.into(),
        }
    }

    /// Returns the query parameter this resolver reads.
    pub fn param_name(&self) -> &str {
        &self.param_name
    }
}

impl Default for QueryStringTenantResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT_QUERY_PARAM)
    }
}

#[async_trait]
impl TenantResolver for QueryStringTenantResolver {
    async fn resolve(
        &self,
        request: &dyn RequestContext,
        _cancel: &CancellationToken,
    ) -> Option<String> {
        request.query_param(&self.param_name)
    }

    fn source(&self) -> TenantSource {
        TenantSource::QueryString
    }
}

/// Resolves the tenant from a claim of the authenticated principal.
#[derive(Debug, Clone)]
pub struct ClaimTenantResolver {
    claim_type: String,
}

impl ClaimTenantResolver {
    /// Creates a resolver reading the given claim type.
    pub fn new(claim_type: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
        }
    }

    /// Returns the claim type this resolver reads.
    pub fn claim_type(&self) -> &str {
        &self.claim_type
    }
}

impl Default for ClaimTenantResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT_CLAIM)
    }
}

#[async_trait]
impl TenantResolver for ClaimTenantResolver {
    async fn resolve(
        &self,
        request: &dyn RequestContext,
        _cancel: &CancellationToken,
    ) -> Option<String> {
        request
            .principal()?
            .find_first(&self.claim_type)
            .map(String::from)
    }

    fn source(&self) -> TenantSource {
        TenantSource::Claim
    }
}

/// Resolves the tenant from a route-template variable, e.g.
/// `/api/{tenantId}/resources`.
#[derive(Debug, Clone)]
pub struct RouteValueTenantResolver {
    route_key: String,
}

impl RouteValueTenantResolver {
    /// Creates a resolver reading the given route variable.
    pub fn new(route_key: impl Into<String>) -> Self {
        Self {
            route_key: route_key.into(),
        }
    }

    /// Returns the route variable this resolver reads.
    pub fn route_key(&self) -> &str {
        &self.route_key
    }
}

impl Default for RouteValueTenantResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT_ROUTE_KEY)
    }
}

#[async_trait]
impl TenantResolver for RouteValueTenantResolver {
    async fn resolve(
        &self,
        request: &dyn RequestContext,
        _cancel: &CancellationToken,
    ) -> Option<String> {
        request.route_value(&self.route_key).map(String::from)
    }

    fn source(&self) -> TenantSource {
        TenantSource::RouteValue
    }
}

/// Resolves the tenant from the first label of the request host.
///
/// `acme.myapp.com` resolves to `acme`. Hosts with fewer than three labels
/// (`myapp.com`, `localhost`) and IP literals have no tenant subdomain.
/// Labels in the exclusion set are ignored; the match is case-insensitive
/// but the returned label keeps its original case.
#[derive(Debug, Clone)]
pub struct SubdomainTenantResolver {
    excluded: HashSet<String>,
}

impl SubdomainTenantResolver {
    /// Creates a resolver with a custom exclusion set.
    ///
    /// The set replaces [`DEFAULT_EXCLUDED_SUBDOMAINS`] entirely.
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            excluded: excluded
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns true if `label` is in the exclusion set.
    pub fn is_excluded(&self, label: &str) -> bool {
        self.excluded.contains(&label.to_ascii_lowercase())
    }

    /// Extracts the tenant label from a host name.
    pub fn extract<'a>(&self, host: &'a str) -> Option<&'a str> {
        if host.parse::<IpAddr>().is_ok() {
            return None;
        }

        let mut labels = host.split('.');
        let first = labels.next()?;
        if labels.take(2).count() < 2 {
            return None;
        }

        if self.is_excluded(first) {
            None
        } else {
            Some(first)
        }
    }
}

impl Default for SubdomainTenantResolver {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_SUBDOMAINS)
    }
}

#[async_trait]
impl TenantResolver for SubdomainTenantResolver {
    async fn resolve(
        &self,
        request: &dyn RequestContext,
        _cancel: &CancellationToken,
    ) -> Option<String> {
        self.extract(request.host()?).map(String::from)
    }

    fn source(&self) -> TenantSource {
        TenantSource::Subdomain
    }
}
