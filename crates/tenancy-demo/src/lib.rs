//! # helios-tenancy-demo
//!
//! A small multi-tenant API showing the tenant pipeline in an axum server.
//!
//! | Endpoint | Tenant | Description |
//! |----------|--------|-------------|
//! | `GET /` | no | Service banner |
//! | `GET /health` | no | Liveness probe |
//! | `GET /admin/tenants` | no | All tenants known to the store |
//! | `GET /info` | optional | The resolved tenant, if any |
//! | `GET /data` | required (401) | Per-tenant records |
//! | `GET /features` | required (401) | Feature flags for the tenant's plan |
//!
//! Try it with:
//!
//! ```text
//! curl http://localhost:8080/info -H "X-Tenant-Id: acme"
//! curl "http://localhost:8080/info?tenant=globex"
//! TENANCY_RESOLVERS=header tenancy-demo   # header only
//! ```

pub mod config;
pub mod handlers;
pub mod seed;

pub use config::DemoConfig;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use helios_tenancy::{InMemoryTenantStore, TenantCatalog};
use helios_tenancy_axum::{TenancyState, with_tenancy};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Shared state of the demo handlers.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<dyn TenantCatalog>,
}

impl AppState {
    /// Creates the state over a tenant catalog.
    pub fn new(catalog: Arc<dyn TenantCatalog>) -> Self {
        Self { catalog }
    }
}

/// Builds the demo application from its configuration.
///
/// # Errors
///
/// Fails if the seed file cannot be read or the tenant pipeline cannot be
/// built from the configuration.
pub fn create_app(config: &DemoConfig) -> anyhow::Result<Router> {
    let tenants = seed::load_tenants(config.seed_file.as_deref())?;
    let store = Arc::new(InMemoryTenantStore::new(tenants)?);
    info!(tenants = store.len(), "Tenant store ready");

    let pipeline = config
        .tenancy
        .pipeline_builder()
        .with_store(store.clone())
        .build()?;
    info!(pipeline = ?pipeline, "Tenant pipeline ready");

    let tenancy = TenancyState::new(pipeline)
        .with_resolution_timeout(config.tenancy.resolution_timeout());

    let tenant_routes = Router::new()
        .route("/info", get(handlers::info))
        .route("/data", get(handlers::data))
        .route("/features", get(handlers::features));

    let public_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/admin/tenants", get(handlers::list_tenants))
        .with_state(AppState::new(store));

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    Ok(with_tenancy(tenant_routes, tenancy)
        .merge(public_routes)
        .layer(middleware))
}
