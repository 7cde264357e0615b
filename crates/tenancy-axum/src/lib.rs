//! # helios-tenancy-axum
//!
//! Axum integration for [`helios_tenancy`].
//!
//! - [`tenant_middleware`] runs the tenant pipeline before each handler
//! - [`CurrentTenant`] and [`RequiredTenant`] hand the result to handlers
//! - [`TenancyConfig`] configures resolvers and policy from the environment
//! - [`TenancyRejection`] maps failures to HTTP responses
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use helios_tenancy::Tenant;
//! use helios_tenancy_axum::{CurrentTenant, TenancyConfig, TenancyState, with_tenancy};
//!
//! async fn whoami(CurrentTenant(ctx): CurrentTenant) -> String {
//!     ctx.to_string()
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TenancyConfig::from_env();
//!     let pipeline = config
//!         .pipeline_builder()
//!         .with_in_memory_store([Tenant::new("acme", "Acme Corp")])
//!         .build()?;
//!     let state = TenancyState::new(pipeline).with_resolution_timeout(config.resolution_timeout());
//!
//!     let app = with_tenancy(Router::new().route("/whoami", get(whoami)), state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod request;

pub use config::{ResolverKind, TenancyConfig};
pub use error::TenancyRejection;
pub use extractor::{CurrentTenant, RequiredTenant};
pub use middleware::{TenancyState, tenant_middleware};
pub use request::HttpRequestContext;

use axum::Router;

/// Installs the tenant middleware on every route of `router`.
///
/// The middleware is added as a route layer: it runs after routing, so the
/// route resolver can see path parameters, and unmatched requests fall
/// through to the router's fallback without tenant resolution.
pub fn with_tenancy<S>(router: Router<S>, state: TenancyState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(axum::middleware::from_fn_with_state(
        state,
        tenant_middleware,
    ))
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "helios_tenancy={level},helios_tenancy_axum={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
