//! Tenant store abstraction.
//!
//! A [`TenantStore`] is the authority that maps a tenant identifier to a full
//! [`Tenant`] record. Implement it to back tenant lookup with a database,
//! cache, or configuration service. [`InMemoryTenantStore`] is the reference
//! implementation for development, testing, and small deployments.
//!
//! # Contract
//!
//! - Lookup is case-insensitive on the tenant id.
//! - An unknown id is `Ok(None)`. `Err` is reserved for real failures
//!   (store unreachable), which the pipeline propagates unchanged.
//! - Implementations should stop work once the cancellation token fires.
//!   The pipeline treats a lookup as atomic and never retries it.

mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StoreResult;
use crate::tenant::Tenant;

pub use memory::InMemoryTenantStore;

/// Looks up tenants by identifier.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Returns a human-readable name for this store backend.
    fn backend_name(&self) -> &'static str;

    /// Retrieves a tenant by its identifier.
    ///
    /// # Errors
    ///
    /// * `StoreError::Unavailable` - if the backing system cannot be reached
    async fn find_by_id(
        &self,
        tenant_id: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<Arc<Tenant>>>;
}

/// Enumerates every tenant a store knows, for diagnostics and admin tooling.
#[async_trait]
pub trait TenantCatalog: Send + Sync {
    /// Returns all tenants, ordered by id.
    async fn list_tenants(&self) -> StoreResult<Vec<Arc<Tenant>>>;
}
