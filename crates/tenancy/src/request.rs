//! Request context accessor.
//!
//! The pipeline never inspects transport bytes. Instead, each transport
//! adapter exposes the handful of lookups the resolvers need through the
//! [`RequestContext`] trait.

use std::collections::HashMap;

/// Read-only view of an inbound request.
///
/// Implementations must be cheap to query repeatedly: the same lookup may be
/// performed by several resolvers in one pipeline run, and two calls on an
/// unmodified request must return the same answer.
pub trait RequestContext: Send + Sync {
    /// Returns the first value of the named header, if present and textual.
    ///
    /// Header names are compared case-insensitively.
    fn header(&self, name: &str) -> Option<&str>;

    /// Returns the first decoded value of the named query parameter.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Returns the authenticated principal attached to the request.
    fn principal(&self) -> Option<&Principal>;

    /// Returns the value bound to a route-template variable.
    fn route_value(&self, key: &str) -> Option<&str>;

    /// Returns the request host without any port.
    fn host(&self) -> Option<&str>;

    /// Returns the request path.
    fn path(&self) -> &str;
}

/// A single claim carried by a [`Principal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// The claim type, e.g. `tenant_id`.
    pub claim_type: String,
    /// The claim value.
    pub value: String,
}

impl Claim {
    /// Creates a new claim.
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// The authenticated caller of a request, as established by an upstream
/// authentication layer.
///
/// Authentication is not performed here. An authentication middleware that
/// has already validated the caller's token attaches a `Principal` to the
/// request, and the claim resolver reads from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    subject: Option<String>,
    claims: Vec<Claim>,
}

impl Principal {
    /// Creates a principal with no subject and no claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject (caller identity).
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Adds a claim.
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(Claim::new(claim_type, value));
        self
    }

    /// Returns the subject, if any.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns all claims in the order they were added.
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Returns the value of the first claim of the given type.
    ///
    /// Claim types are compared ASCII case-insensitively.
    pub fn find_first(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type.eq_ignore_ascii_case(claim_type))
            .map(|c| c.value.as_str())
    }
}

/// Values bound to the variables of the matched route template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues(HashMap<String, String>);

impl RouteValues {
    /// Creates an empty set of route values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value to a route variable.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value bound to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns true if no variables are bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_find_first() {
        let principal = Principal::new()
            .with_subject("user-1")
            .with_claim("tenant_id", "acme")
            .with_claim("tenant_id", "globex");

        assert_eq!(principal.subject(), Some("user-1"));
        assert_eq!(principal.find_first("tenant_id"), Some("acme"));
        assert_eq!(principal.find_first("TENANT_ID"), Some("acme"));
        assert_eq!(principal.find_first("org"), None);
        assert_eq!(principal.claims().len(), 2);
    }

    #[test]
    fn test_route_values() {
        let values: RouteValues = [("tenantId", "acme"), ("id", "42")].into_iter().collect();
        assert_eq!(values.get("tenantId"), Some("acme"));
        assert_eq!(values.get("missing"), None);
        assert!(!values.is_empty());
        assert!(RouteValues::new().is_empty());
    }
}
