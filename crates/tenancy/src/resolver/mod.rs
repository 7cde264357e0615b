//! Tenant identifier resolution.
//!
//! A [`TenantResolver`] extracts a candidate tenant identifier from a
//! request. It never consults a store, so the identifier may or may not name
//! a known tenant.
//!
//! Built-in strategies:
//!
//! - [`HeaderTenantResolver`] - `X-Tenant-Id` header (default)
//! - [`QueryStringTenantResolver`] - `?tenant=` query parameter
//! - [`ClaimTenantResolver`] - `tenant_id` claim of the authenticated principal
//! - [`RouteValueTenantResolver`] - `{tenantId}` route variable
//! - [`SubdomainTenantResolver`] - first label of `acme.myapp.com`
//!
//! [`CompositeTenantResolver`] chains several strategies; the first one to
//! produce a non-blank identifier wins.
//!
//! # Blank values
//!
//! A missing, empty, or whitespace-only value is "no identifier", never an
//! error. [`TenantResolver::resolve_identifier`] applies that rule to every
//! resolver, including custom ones.

mod composite;
mod source;
mod strategies;

use std::fmt;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::request::RequestContext;

pub use composite::CompositeTenantResolver;
pub use source::TenantSource;
pub use strategies::{
    ClaimTenantResolver, DEFAULT_EXCLUDED_SUBDOMAINS, DEFAULT_TENANT_CLAIM, DEFAULT_TENANT_HEADER,
    DEFAULT_TENANT_QUERY_PARAM, DEFAULT_TENANT_ROUTE_KEY, HeaderTenantResolver,
    QueryStringTenantResolver, RouteValueTenantResolver, SubdomainTenantResolver,
};

/// A strategy that extracts a tenant identifier candidate from a request.
///
/// Implementations must not modify the request and must return the same
/// answer when called twice on the same request. Resolvers that perform I/O
/// (a remote claims service, for example) should stop work once `cancel` is
/// triggered; the pipeline abandons the call at that point either way.
#[async_trait]
pub trait TenantResolver: Send + Sync {
    /// Attempts to extract a tenant identifier.
    ///
    /// Returns `None` if the request carries no identifier for this source.
    async fn resolve(
        &self,
        request: &dyn RequestContext,
        cancel: &CancellationToken,
    ) -> Option<String>;

    /// Returns the source type this resolver reads from.
    fn source(&self) -> TenantSource;

    /// Resolves and tags the identifier with its source.
    ///
    /// Blank results are discarded.
    async fn resolve_identifier(
        &self,
        request: &dyn RequestContext,
        cancel: &CancellationToken,
    ) -> Option<ResolvedIdentifier> {
        let value = non_blank(self.resolve(request, cancel).await)?;
        Some(ResolvedIdentifier::new(value, self.source()))
    }
}

/// A tenant identifier together with the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentifier {
    value: String,
    source: TenantSource,
}

impl ResolvedIdentifier {
    /// Creates a new resolved identifier.
    pub fn new(value: impl Into<String>, source: TenantSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    /// Returns the identifier exactly as the resolver produced it.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the source of the identifier.
    pub fn source(&self) -> TenantSource {
        self.source
    }

    /// Consumes the identifier and returns its value.
    pub fn into_value(self) -> String {
        self.value
    }
}

impl fmt::Display for ResolvedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.value, self.source)
    }
}

/// Treats missing, empty, and whitespace-only values as absent.
pub(crate) fn non_blank<S>(value: Option<S>) -> Option<String>
where
    S: AsRef<str> + Into<String>,
{
    value.filter(|v| !v.as_ref().trim().is_empty()).map(Into::into)
}
