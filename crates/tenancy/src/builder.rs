//! Fluent pipeline configuration.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{BuildError, StoreError};
use crate::pipeline::{ResolutionPolicy, TenantPipeline};
use crate::resolver::{
    ClaimTenantResolver, CompositeTenantResolver, HeaderTenantResolver,
    QueryStringTenantResolver, RouteValueTenantResolver, SubdomainTenantResolver, TenantResolver,
};
use crate::store::{InMemoryTenantStore, TenantStore};
use crate::tenant::Tenant;

/// Assembles a [`TenantPipeline`].
///
/// Resolvers are tried in the order they are added. With no resolvers the
/// pipeline reads the default `X-Tenant-Id` header; with exactly one, that
/// resolver is used directly; with more, they are chained in a
/// [`CompositeTenantResolver`].
///
/// # Example
///
/// ```
/// use helios_tenancy::{Tenant, TenantPipeline};
///
/// let pipeline = TenantPipeline::builder()
///     .use_header_resolver("X-Tenant-Id")
///     .use_subdomain_resolver(None::<Vec<String>>)
///     .with_in_memory_store([Tenant::new("acme", "Acme Corp")])
///     .require_tenant(true)
///     .build()?;
///
/// assert!(pipeline.policy().require_tenant);
/// # Ok::<(), helios_tenancy::BuildError>(())
/// ```
#[derive(Default)]
pub struct TenantPipelineBuilder {
    resolvers: Vec<Arc<dyn TenantResolver>>,
    store: Option<Result<Arc<dyn TenantStore>, StoreError>>,
    policy: ResolutionPolicy,
}

impl TenantPipelineBuilder {
    /// Creates an empty builder with the permissive default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header resolver.
    pub fn use_header_resolver(self, header_name: impl Into<String>) -> Self {
        self.use_resolver(HeaderTenantResolver::new(header_name))
    }

    /// Adds a query-string resolver.
    pub fn use_query_string_resolver(self, param_name: impl Into<String>) -> Self {
        self.use_resolver(QueryStringTenantResolver::new(param_name))
    }

    /// Adds a claim resolver.
    pub fn use_claim_resolver(self, claim_type: impl Into<String>) -> Self {
        self.use_resolver(ClaimTenantResolver::new(claim_type))
    }

    /// Adds a route-value resolver.
    pub fn use_route_value_resolver(self, route_key: impl Into<String>) -> Self {
        self.use_resolver(RouteValueTenantResolver::new(route_key))
    }

    /// Adds a subdomain resolver.
    ///
    /// `None` keeps the default exclusion list; `Some` replaces it.
    pub fn use_subdomain_resolver<I, S>(self, excluded: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolver = match excluded {
            Some(excluded) => SubdomainTenantResolver::new(excluded),
            None => SubdomainTenantResolver::default(),
        };
        self.use_resolver(resolver)
    }

    /// Adds a custom resolver.
    pub fn use_resolver(mut self, resolver: impl TenantResolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Adds an already shared resolver.
    pub fn use_shared_resolver(mut self, resolver: Arc<dyn TenantResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Uses an [`InMemoryTenantStore`] seeded with `tenants`.
    ///
    /// Seed errors are reported by [`build`](Self::build).
    pub fn with_in_memory_store(mut self, tenants: impl IntoIterator<Item = Tenant>) -> Self {
        self.store = Some(
            InMemoryTenantStore::new(tenants).map(|store| Arc::new(store) as Arc<dyn TenantStore>),
        );
        self
    }

    /// Uses a custom store.
    pub fn with_store(mut self, store: Arc<dyn TenantStore>) -> Self {
        self.store = Some(Ok(store));
        self
    }

    /// Rejects requests that carry no tenant identifier.
    pub fn require_tenant(mut self, require: bool) -> Self {
        self.policy.require_tenant = require;
        self
    }

    /// Rejects requests whose identifier is unknown to the store.
    pub fn throw_on_tenant_not_found(mut self, throw: bool) -> Self {
        self.policy.throw_on_tenant_not_found = throw;
        self
    }

    /// Replaces the whole policy.
    pub fn policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// * `BuildError::MissingStore` - no store was configured
    /// * `BuildError::Store` - the in-memory seed was invalid
    pub fn build(self) -> Result<TenantPipeline, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)??;

        let mut resolvers = self.resolvers;
        let resolver: Arc<dyn TenantResolver> = match resolvers.len() {
            0 => {
                warn!("No tenant resolvers configured; falling back to the default header");
                Arc::new(HeaderTenantResolver::default())
            }
            1 => resolvers.remove(0),
            _ => Arc::new(CompositeTenantResolver::new(resolvers)),
        };

        debug!(
            source = %resolver.source(),
            store = store.backend_name(),
            require_tenant = self.policy.require_tenant,
            throw_on_tenant_not_found = self.policy.throw_on_tenant_not_found,
            "Built tenant pipeline"
        );

        Ok(TenantPipeline::new(resolver, store, self.policy))
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::resolver::TenantSource;
    use crate::testing::FakeRequest;

    fn seed() -> Vec<Tenant> {
        vec![
            Tenant::new("acme", "Acme Corp"),
            Tenant::new("globex", "Globex Inc"),
        ]
    }

    #[test]
    fn test_missing_store() {
        let result = TenantPipelineBuilder::new().use_header_resolver("X-Tenant-Id").build();
        assert!(matches!(result, Err(BuildError::MissingStore)));
    }

    #[test]
    fn test_invalid_seed_reported_at_build() {
        let result = TenantPipelineBuilder::new()
            .with_in_memory_store([Tenant::new("acme", "A"), Tenant::new("Acme", "B")])
            .build();
        assert!(matches!(
            result,
            Err(BuildError::Store(StoreError::DuplicateTenant { .. }))
        ));
    }

    #[test]
    fn test_no_resolvers_falls_back_to_header() {
        let pipeline = TenantPipelineBuilder::new()
            .with_in_memory_store(seed())
            .build()
            .unwrap();
        assert_eq!(pipeline.resolver().source(), TenantSource::Header);
    }

    #[test]
    fn test_single_resolver_used_directly() {
        let pipeline = TenantPipelineBuilder::new()
            .use_query_string_resolver("tenant")
            .with_in_memory_store(seed())
            .build()
            .unwrap();
        assert_eq!(pipeline.resolver().source(), TenantSource::QueryString);
    }

    #[test]
    fn test_multiple_resolvers_composed() {
        let pipeline = TenantPipelineBuilder::new()
            .use_header_resolver("X-Tenant-Id")
            .use_query_string_resolver("tenant")
            .use_claim_resolver("tenant_id")
            .use_route_value_resolver("tenantId")
            .use_subdomain_resolver(Some(["www"]))
            .with_in_memory_store(seed())
            .build()
            .unwrap();
        assert_eq!(pipeline.resolver().source(), TenantSource::Composite);
    }

    #[test]
    fn test_policy_flags() {
        let pipeline = TenantPipelineBuilder::new()
            .with_in_memory_store(seed())
            .require_tenant(true)
            .throw_on_tenant_not_found(true)
            .build()
            .unwrap();
        assert_eq!(pipeline.policy(), ResolutionPolicy::strict());

        let pipeline = TenantPipelineBuilder::new()
            .with_in_memory_store(seed())
            .build()
            .unwrap();
        assert_eq!(pipeline.policy(), ResolutionPolicy::default());
    }

    #[test]
    fn test_with_store_replaces_seed() {
        let custom = Arc::new(InMemoryTenantStore::new([Tenant::new("initech", "Initech")]).unwrap());
        let pipeline = TenantPipelineBuilder::new()
            .with_in_memory_store([Tenant::new("x", "X"), Tenant::new("X", "X")])
            .with_store(custom)
            .build()
            .unwrap();
        assert_eq!(pipeline.store().backend_name(), "in-memory");
    }

    #[tokio::test]
    async fn test_precedence_follows_registration_order() {
        let pipeline = TenantPipelineBuilder::new()
            .use_query_string_resolver("tenant")
            .use_header_resolver("X-Tenant-Id")
            .with_in_memory_store(seed())
            .build()
            .unwrap();

        let request = FakeRequest::new("/")
            .with_header("X-Tenant-Id", "acme")
            .with_query("tenant", "globex");

        let context = pipeline
            .run(&request, &CancellationToken::new())
            .await
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(context.tenant_id(), Some("globex"));
    }
}
