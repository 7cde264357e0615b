//! In-memory tenant store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::tenant::{Tenant, lookup_key};

use super::{TenantCatalog, TenantStore};

/// A fixed tenant mapping seeded once at startup.
///
/// The map is never modified after construction, so concurrent lookups need
/// no locking.
///
/// # Example
///
/// ```
/// use helios_tenancy::{InMemoryTenantStore, Tenant};
///
/// let store = InMemoryTenantStore::new([
///     Tenant::new("acme", "Acme Corp"),
///     Tenant::new("globex", "Globex Inc"),
/// ])?;
///
/// assert_eq!(store.get("ACME").unwrap().id(), "acme");
/// assert_eq!(store.len(), 2);
/// # Ok::<(), helios_tenancy::StoreError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantStore {
    tenants: HashMap<String, Arc<Tenant>>,
}

impl InMemoryTenantStore {
    /// Builds the store from a seed collection.
    ///
    /// # Errors
    ///
    /// * `StoreError::InvalidSeed` - a tenant has a blank id
    /// * `StoreError::DuplicateTenant` - two ids are equal ignoring case
    pub fn new(seed: impl IntoIterator<Item = Tenant>) -> StoreResult<Self> {
        let mut tenants = HashMap::new();

        for tenant in seed {
            if tenant.id().trim().is_empty() {
                return Err(StoreError::InvalidSeed {
                    message: format!("tenant '{}' has a blank id", tenant.name()),
                });
            }

            match tenants.entry(lookup_key(tenant.id())) {
                Entry::Occupied(_) => {
                    return Err(StoreError::DuplicateTenant {
                        tenant_id: tenant.id().to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(tenant));
                }
            }
        }

        debug!(count = tenants.len(), "Seeded in-memory tenant store");
        Ok(Self { tenants })
    }

    /// Looks up a tenant synchronously. Blank ids are never found.
    pub fn get(&self, tenant_id: &str) -> Option<Arc<Tenant>> {
        if tenant_id.trim().is_empty() {
            return None;
        }
        self.tenants.get(&lookup_key(tenant_id)).cloned()
    }

    /// Returns all registered tenants, ordered by id.
    pub fn all(&self) -> Vec<Arc<Tenant>> {
        let mut all: Vec<_> = self.tenants.values().cloned().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// Returns the number of tenants.
    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    /// Returns true if the store holds no tenants.
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn find_by_id(
        &self,
        tenant_id: &str,
        _cancel: &CancellationToken,
    ) -> StoreResult<Option<Arc<Tenant>>> {
        Ok(self.get(tenant_id))
    }
}

#[async_trait]
impl TenantCatalog for InMemoryTenantStore {
    async fn list_tenants(&self) -> StoreResult<Vec<Arc<Tenant>>> {
        Ok(self.all())
    }
}
