//! The tenant entity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A customer or organization in a multi-tenant deployment.
///
/// Tenants are immutable once constructed. Stores hand them out as
/// `Arc<Tenant>` so a single record can be shared by every request that
/// resolves to it.
///
/// The `id` is the lookup key. Comparisons against it are case-insensitive
/// (see [`Tenant::matches_id`]), but the id itself keeps the casing it was
/// created with.
///
/// # Examples
///
/// ```
/// use helios_tenancy::Tenant;
///
/// let tenant = Tenant::with_metadata(
///     "acme",
///     "Acme Corp",
///     [("plan", "enterprise"), ("region", "eu-west-1")],
/// );
///
/// assert_eq!(tenant.id(), "acme");
/// assert_eq!(tenant.metadata_value("plan"), Some("enterprise"));
/// assert!(tenant.matches_id("ACME"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    id: String,
    name: String,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

impl Tenant {
    /// Creates a tenant with no metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Creates a tenant with metadata.
    pub fn with_metadata<I, K, V>(id: impl Into<String>, name: impl Into<String>, metadata: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            metadata: metadata
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the tenant identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all metadata entries.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Returns a single metadata value.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Returns true if `candidate` names this tenant, ignoring case.
    pub fn matches_id(&self, candidate: &str) -> bool {
        lookup_key(&self.id) == lookup_key(candidate)
    }
}

/// Normalizes a tenant id into the key used for case-insensitive lookups.
///
/// Uses Unicode lowercasing: ASCII ids fold exactly as an ordinal
/// ignore-case comparison would, and non-ASCII letters fold too.
pub(crate) fn lookup_key(id: &str) -> String {
    id.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_id_and_name() {
        let tenant = Tenant::new("acme", "Acme Corp");
        assert_eq!(tenant.id(), "acme");
        assert_eq!(tenant.name(), "Acme Corp");
        assert!(tenant.metadata().is_empty());
    }

    #[test]
    fn test_with_metadata() {
        let tenant = Tenant::with_metadata(
            "acme",
            "Acme Corp",
            [("plan", "enterprise"), ("region", "eu-west-1")],
        );

        assert_eq!(tenant.metadata_value("plan"), Some("enterprise"));
        assert_eq!(tenant.metadata_value("region"), Some("eu-west-1"));
        assert_eq!(tenant.metadata_value("theme"), None);
    }

    #[test]
    fn test_equal_values_are_equal() {
        assert_eq!(Tenant::new("id1", "Name"), Tenant::new("id1", "Name"));
        assert_ne!(Tenant::new("id1", "Name"), Tenant::new("id2", "Name"));
    }

    #[test]
    fn test_matches_id_ignores_case() {
        let tenant = Tenant::new("Acme", "Acme Corp");
        assert!(tenant.matches_id("acme"));
        assert!(tenant.matches_id("ACME"));
        assert!(!tenant.matches_id("globex"));
    }

    #[test]
    fn test_matches_id_folds_non_ascii() {
        let tenant = Tenant::new("Äcme", "Äcme GmbH");
        assert!(tenant.matches_id("äCME"));
        assert_eq!(lookup_key("ÄCME"), "äcme");
    }

    #[test]
    fn test_deserialize_without_metadata() {
        let tenant: Tenant =
            serde_json::from_str(r#"{"id": "free", "name": "Free User"}"#).unwrap();
        assert_eq!(tenant.id(), "free");
        assert!(tenant.metadata().is_empty());
    }

    #[test]
    fn test_serialize_includes_metadata() {
        let tenant = Tenant::with_metadata("globex", "Globex Inc", [("plan", "starter")]);
        let json = serde_json::to_value(&tenant).unwrap();
        assert_eq!(json["metadata"]["plan"], "starter");
    }
}
