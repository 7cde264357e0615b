//! Request-scoped tenant context.

use std::fmt;
use std::sync::Arc;

use crate::resolver::ResolvedIdentifier;
use crate::tenant::Tenant;

/// How the pipeline ended up with (or without) a tenant.
///
/// `NotFound` and `Anonymous` both leave the request without a tenant, but
/// they are kept apart so that downstream code and audit logs can tell an
/// unknown identifier from a request that carried none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Resolution {
    /// No resolver produced an identifier.
    #[default]
    Anonymous,
    /// An identifier was resolved but the store does not know it.
    NotFound {
        /// The unmatched identifier.
        identifier: ResolvedIdentifier,
    },
    /// The identifier matched a tenant.
    Resolved {
        /// The matched tenant.
        tenant: Arc<Tenant>,
        /// The identifier that matched it.
        identifier: ResolvedIdentifier,
    },
}

/// The tenant (or its absence) for one request.
///
/// The pipeline builds one `TenantContext` per request, complete, before any
/// downstream handler runs. There are no setters: the value handed to
/// handlers is the value the pipeline produced.
///
/// # Example
///
/// ```
/// use helios_tenancy::TenantContext;
///
/// let ctx = TenantContext::anonymous();
/// assert!(!ctx.has_tenant());
/// assert!(ctx.current().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    resolution: Resolution,
}

impl TenantContext {
    /// Creates a context for a request without a tenant identifier.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a context for a resolved tenant.
    pub fn resolved(tenant: Arc<Tenant>, identifier: ResolvedIdentifier) -> Self {
        Self {
            resolution: Resolution::Resolved { tenant, identifier },
        }
    }

    /// Creates a context for an identifier the store does not know.
    pub fn not_found(identifier: ResolvedIdentifier) -> Self {
        Self {
            resolution: Resolution::NotFound { identifier },
        }
    }

    /// Returns the current tenant, if one was resolved.
    pub fn current(&self) -> Option<&Arc<Tenant>> {
        match &self.resolution {
            Resolution::Resolved { tenant, .. } => Some(tenant),
            _ => None,
        }
    }

    /// Returns true if a tenant was resolved for this request.
    pub fn has_tenant(&self) -> bool {
        self.current().is_some()
    }

    /// Returns the canonical id of the current tenant.
    pub fn tenant_id(&self) -> Option<&str> {
        self.current().map(|t| t.id())
    }

    /// Returns the identifier the resolvers produced, whether or not it
    /// matched a tenant.
    pub fn identifier(&self) -> Option<&ResolvedIdentifier> {
        match &self.resolution {
            Resolution::Resolved { identifier, .. } | Resolution::NotFound { identifier } => {
                Some(identifier)
            }
            Resolution::Anonymous => None,
        }
    }

    /// Returns the resolution state.
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }
}

impl From<Resolution> for TenantContext {
    fn from(resolution: Resolution) -> Self {
        Self { resolution }
    }
}

impl fmt::Display for TenantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resolution {
            Resolution::Resolved { tenant, .. } => write!(f, "{}", tenant.id()),
            Resolution::NotFound { identifier } => write!(f, "unknown:{}", identifier.value()),
            Resolution::Anonymous => write!(f, "anonymous"),
        }
    }
}
