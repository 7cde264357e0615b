//! # helios-tenancy
//!
//! Tenant resolution for multi-tenant Helios services.
//!
//! Every inbound request is mapped to the tenant (customer, organization) it
//! belongs to before any business logic runs:
//!
//! 1. A [`TenantResolver`] extracts a candidate identifier from the request
//!    (header, query parameter, claim, route value, or subdomain).
//! 2. A [`TenantStore`] looks the identifier up.
//! 3. A [`ResolutionPolicy`] decides whether a missing or unknown tenant
//!    rejects the request.
//! 4. The resulting [`TenantContext`] travels with the request.
//!
//! The crate is transport-agnostic: requests are seen through the
//! [`RequestContext`] trait. The `helios-tenancy-axum` crate adapts it to
//! axum middleware.
//!
//! ## Example
//!
//! ```no_run
//! use helios_tenancy::{Tenant, TenantPipeline};
//!
//! # fn example() -> Result<(), helios_tenancy::BuildError> {
//! let pipeline = TenantPipeline::builder()
//!     .use_header_resolver("X-Tenant-Id")
//!     .use_query_string_resolver("tenant")
//!     .with_in_memory_store([
//!         Tenant::new("acme", "Acme Corp"),
//!         Tenant::new("globex", "Globex Inc"),
//!     ])
//!     .throw_on_tenant_not_found(true)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod resolver;
pub mod store;
pub mod tenant;

#[cfg(test)]
mod testing;

pub use builder::TenantPipelineBuilder;
pub use context::{Resolution, TenantContext};
pub use error::{
    BoxError, BuildError, Rejection, StoreError, StoreResult, TenancyError, TenancyResult,
};
pub use pipeline::{ResolutionOutcome, ResolutionPolicy, Stage, TenantPipeline, enforce};
pub use request::{Claim, Principal, RequestContext, RouteValues};
pub use resolver::{
    ClaimTenantResolver, CompositeTenantResolver, HeaderTenantResolver,
    QueryStringTenantResolver, ResolvedIdentifier, RouteValueTenantResolver,
    SubdomainTenantResolver, TenantResolver, TenantSource,
};
pub use store::{InMemoryTenantStore, TenantCatalog, TenantStore};
pub use tenant::Tenant;

/// Re-exported so custom resolvers and stores can name the token type.
pub use tokio_util::sync::CancellationToken;
