//! Tenant resolution configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TENANCY_REQUIRE_TENANT` | false | Reject requests with no tenant identifier |
//! | `TENANCY_THROW_ON_NOT_FOUND` | false | Reject unknown tenant identifiers |
//! | `TENANCY_RESOLVERS` | header,query | Ordered resolver list (`header,query,claim,route,subdomain`) |
//! | `TENANCY_HEADER_NAME` | X-Tenant-Id | Header read by the header resolver |
//! | `TENANCY_QUERY_PARAM` | tenant | Query parameter read by the query resolver |
//! | `TENANCY_CLAIM_TYPE` | tenant_id | Claim read by the claim resolver |
//! | `TENANCY_ROUTE_KEY` | tenantId | Route variable read by the route resolver |
//! | `TENANCY_EXCLUDED_SUBDOMAINS` | www,api,app,mail,ftp,admin | Labels that are never tenants |
//! | `TENANCY_RESOLUTION_TIMEOUT_MS` | (none) | Upper bound on resolution per request |
//!
//! # Example
//!
//! ```rust
//! use helios_tenancy::Tenant;
//! use helios_tenancy_axum::{ResolverKind, TenancyConfig};
//!
//! let config = TenancyConfig {
//!     resolvers: vec![ResolverKind::Header, ResolverKind::Subdomain],
//!     throw_on_tenant_not_found: true,
//!     ..Default::default()
//! };
//!
//! let pipeline = config
//!     .pipeline_builder()
//!     .with_in_memory_store([Tenant::new("acme", "Acme Corp")])
//!     .build()
//!     .unwrap();
//! assert!(pipeline.policy().throw_on_tenant_not_found);
//! ```

use std::fmt;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use helios_tenancy::TenantPipelineBuilder;
use helios_tenancy::resolver::{
    DEFAULT_EXCLUDED_SUBDOMAINS, DEFAULT_TENANT_CLAIM, DEFAULT_TENANT_HEADER,
    DEFAULT_TENANT_QUERY_PARAM, DEFAULT_TENANT_ROUTE_KEY,
};
use serde::{Deserialize, Serialize};

/// A built-in resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Request header.
    Header,
    /// Query-string parameter.
    Query,
    /// Claim of the authenticated principal.
    Claim,
    /// Route-template variable.
    Route,
    /// First label of the host name.
    Subdomain,
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolverKind::Header => "header",
            ResolverKind::Query => "query",
            ResolverKind::Claim => "claim",
            ResolverKind::Route => "route",
            ResolverKind::Subdomain => "subdomain",
        };
        f.write_str(name)
    }
}

/// Tenant resolution configuration.
///
/// This struct can be constructed from environment variables using
/// [`TenancyConfig::from_env`], flattened into a binary's own `clap` parser,
/// or built programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "tenancy")]
#[command(about = "Tenant resolution settings")]
pub struct TenancyConfig {
    /// Reject requests that carry no tenant identifier.
    #[arg(long, env = "TENANCY_REQUIRE_TENANT", default_value = "false")]
    pub require_tenant: bool,

    /// Reject requests whose tenant identifier is unknown.
    #[arg(long, env = "TENANCY_THROW_ON_NOT_FOUND", default_value = "false")]
    pub throw_on_tenant_not_found: bool,

    /// Resolvers to try, in precedence order (comma-separated).
    #[arg(
        long,
        env = "TENANCY_RESOLVERS",
        value_enum,
        value_delimiter = ',',
        default_values = ["header", "query"]
    )]
    pub resolvers: Vec<ResolverKind>,

    /// Header read by the header resolver.
    #[arg(long, env = "TENANCY_HEADER_NAME", default_value = DEFAULT_TENANT_HEADER)]
    pub header_name: String,

    /// Query parameter read by the query resolver.
    #[arg(long, env = "TENANCY_QUERY_PARAM", default_value = DEFAULT_TENANT_QUERY_PARAM)]
    pub query_param: String,

    /// Claim type read by the claim resolver.
    #[arg(long, env = "TENANCY_CLAIM_TYPE", default_value = DEFAULT_TENANT_CLAIM)]
    pub claim_type: String,

    /// Route variable read by the route resolver.
    #[arg(long, env = "TENANCY_ROUTE_KEY", default_value = DEFAULT_TENANT_ROUTE_KEY)]
    pub route_key: String,

    /// Subdomain labels that never name a tenant (comma-separated).
    /// Replaces the built-in list when set.
    #[arg(long, env = "TENANCY_EXCLUDED_SUBDOMAINS", value_delimiter = ',')]
    pub excluded_subdomains: Option<Vec<String>>,

    /// Upper bound on tenant resolution per request, in milliseconds.
    #[arg(long, env = "TENANCY_RESOLUTION_TIMEOUT_MS")]
    pub resolution_timeout_ms: Option<u64>,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            require_tenant: false,
            throw_on_tenant_not_found: false,
            resolvers: vec![ResolverKind::Header, ResolverKind::Query],
            header_name: DEFAULT_TENANT_HEADER.to_string(),
            query_param: DEFAULT_TENANT_QUERY_PARAM.to_string(),
            claim_type: DEFAULT_TENANT_CLAIM.to_string(),
            route_key: DEFAULT_TENANT_ROUTE_KEY.to_string(),
            excluded_subdomains: None,
            resolution_timeout_ms: None,
        }
    }
}

impl TenancyConfig {
    /// Creates a new TenancyConfig from environment variables.
    pub fn from_env() -> Self {
        Self::try_parse_from(["tenancy"]).unwrap_or_default()
    }

    /// Returns the per-request resolution timeout.
    pub fn resolution_timeout(&self) -> Option<Duration> {
        self.resolution_timeout_ms.map(Duration::from_millis)
    }

    /// Returns the effective subdomain exclusion list.
    pub fn effective_excluded_subdomains(&self) -> Vec<String> {
        match &self.excluded_subdomains {
            Some(excluded) => excluded.clone(),
            None => DEFAULT_EXCLUDED_SUBDOMAINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let mut seen = Vec::with_capacity(self.resolvers.len());
        for kind in &self.resolvers {
            if seen.contains(kind) {
                errors.push(format!("Resolver '{}' is listed more than once", kind));
            }
            seen.push(*kind);
        }

        let settings = [
            (ResolverKind::Header, "Header name", &self.header_name),
            (ResolverKind::Query, "Query parameter", &self.query_param),
            (ResolverKind::Claim, "Claim type", &self.claim_type),
            (ResolverKind::Route, "Route key", &self.route_key),
        ];
        for (kind, label, value) in settings {
            if self.resolvers.contains(&kind) && value.trim().is_empty() {
                errors.push(format!("{} cannot be empty", label));
            }
        }

        if self.resolvers.contains(&ResolverKind::Header)
            && http::HeaderName::from_bytes(self.header_name.as_bytes()).is_err()
        {
            errors.push(format!("'{}' is not a valid header name", self.header_name));
        }

        if self.resolution_timeout_ms == Some(0) {
            errors.push("Resolution timeout cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns a pipeline builder with the configured resolvers and policy.
    ///
    /// The store still has to be supplied before building.
    pub fn pipeline_builder(&self) -> TenantPipelineBuilder {
        let builder = self
            .resolvers
            .iter()
            .fold(TenantPipelineBuilder::new(), |builder, kind| match kind {
                ResolverKind::Header => builder.use_header_resolver(&self.header_name),
                ResolverKind::Query => builder.use_query_string_resolver(&self.query_param),
                ResolverKind::Claim => builder.use_claim_resolver(&self.claim_type),
                ResolverKind::Route => builder.use_route_value_resolver(&self.route_key),
                ResolverKind::Subdomain => {
                    builder.use_subdomain_resolver(self.excluded_subdomains.as_ref())
                }
            });

        builder
            .require_tenant(self.require_tenant)
            .throw_on_tenant_not_found(self.throw_on_tenant_not_found)
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Every resolver is enabled, in the order route, claim, header, query,
    /// subdomain.
    pub fn for_testing() -> Self {
        Self {
            resolvers: vec![
                ResolverKind::Route,
                ResolverKind::Claim,
                ResolverKind::Header,
                ResolverKind::Query,
                ResolverKind::Subdomain,
            ],
            resolution_timeout_ms: Some(1_000),
            ..Self::default()
        }
    }
}
