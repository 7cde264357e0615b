//! Tenant source identification.
//!
//! Records which resolution strategy produced a tenant identifier.

use std::fmt;

/// Source from which a tenant identifier was extracted.
///
/// Precedence is decided by the order resolvers are configured in, not by
/// the source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenantSource {
    /// Tenant extracted from a request header.
    Header,
    /// Tenant extracted from a query string parameter.
    QueryString,
    /// Tenant extracted from a claim of the authenticated principal.
    Claim,
    /// Tenant extracted from a route-template variable.
    RouteValue,
    /// Tenant extracted from the first label of the request host.
    Subdomain,
    /// An ordered chain of resolvers.
    Composite,
    /// A user-supplied resolver.
    Custom(&'static str),
}

impl TenantSource {
    /// Returns true if this source reads from the request URL
    /// (query string, route value, or host).
    pub fn is_url_based(&self) -> bool {
        matches!(
            self,
            TenantSource::QueryString | TenantSource::RouteValue | TenantSource::Subdomain
        )
    }

    /// Returns true if this source reads from the authenticated principal.
    pub fn is_claim_based(&self) -> bool {
        matches!(self, TenantSource::Claim)
    }
}

impl fmt::Display for TenantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantSource::Header => write!(f, "header"),
            TenantSource::QueryString => write!(f, "query_string"),
            TenantSource::Claim => write!(f, "claim"),
            TenantSource::RouteValue => write!(f, "route_value"),
            TenantSource::Subdomain => write!(f, "subdomain"),
            TenantSource::Composite => write!(f, "composite"),
            TenantSource::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(TenantSource::Header.to_string(), "header");
        assert_eq!(TenantSource::QueryString.to_string(), "query_string");
        assert_eq!(TenantSource::Claim.to_string(), "claim");
        assert_eq!(TenantSource::RouteValue.to_string(), "route_value");
        assert_eq!(TenantSource::Subdomain.to_string(), "subdomain");
        assert_eq!(TenantSource::Custom("api_key").to_string(), "custom:api_key");
    }

    #[test]
    fn test_is_url_based() {
        assert!(TenantSource::QueryString.is_url_based());
        assert!(TenantSource::RouteValue.is_url_based());
        assert!(TenantSource::Subdomain.is_url_based());
        assert!(!TenantSource::Header.is_url_based());
        assert!(!TenantSource::Claim.is_url_based());
    }

    #[test]
    fn test_is_claim_based() {
        assert!(TenantSource::Claim.is_claim_based());
        assert!(!TenantSource::Header.is_claim_based());
    }
}
