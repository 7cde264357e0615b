//! Tenant resolution middleware.
//!
//! Runs the [`TenantPipeline`] once per request. On success the
//! [`TenantContext`] is inserted into the request extensions and the rest of
//! the stack runs; on rejection or failure the error response is returned
//! and the handler is never called.
//!
//! Install it with [`Router::route_layer`](axum::Router::route_layer) so that
//! route-template values are available to the route resolver:
//!
//! ```rust,ignore
//! use axum::{Router, middleware::from_fn_with_state, routing::get};
//! use helios_tenancy_axum::{TenancyState, tenant_middleware};
//!
//! let app = Router::new()
//!     .route("/api/{tenantId}/data", get(handler))
//!     .route_layer(from_fn_with_state(state, tenant_middleware));
//! ```
//!
//! [`TenantContext`]: helios_tenancy::TenantContext

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{FromRequestParts, Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use helios_tenancy::{ResolutionOutcome, RouteValues, TenancyError, TenancyResult, TenantPipeline};
use http::request::Parts;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::TenancyRejection;
use crate::request::HttpRequestContext;

/// Shared state of the tenant middleware.
#[derive(Debug, Clone)]
pub struct TenancyState {
    pipeline: TenantPipeline,
    resolution_timeout: Option<Duration>,
}

impl TenancyState {
    /// Creates the middleware state around a pipeline.
    pub fn new(pipeline: TenantPipeline) -> Self {
        Self {
            pipeline,
            resolution_timeout: None,
        }
    }

    /// Bounds how long resolution and lookup may take for one request.
    pub fn with_resolution_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.resolution_timeout = timeout;
        self
    }

    /// Returns the pipeline.
    pub fn pipeline(&self) -> &TenantPipeline {
        &self.pipeline
    }

    /// Returns the resolution timeout, if any.
    pub fn resolution_timeout(&self) -> Option<Duration> {
        self.resolution_timeout
    }

    /// Runs the pipeline for the given request parts.
    ///
    /// `cancel` is triggered if the resolution timeout elapses.
    pub async fn resolve(
        &self,
        parts: &Parts,
        cancel: &CancellationToken,
    ) -> TenancyResult<ResolutionOutcome> {
        let request = HttpRequestContext::new(parts);
        let run = self.pipeline.run(&request, cancel);

        match self.resolution_timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(
                        path = parts.uri.path(),
                        timeout_ms = limit.as_millis() as u64,
                        "Tenant resolution timed out"
                    );
                    cancel.cancel();
                    Err(TenancyError::Cancelled)
                }
            },
            None => run.await,
        }
    }
}

/// Middleware function for tenant resolution.
///
/// This can be used with `axum::middleware::from_fn_with_state`.
pub async fn tenant_middleware(
    State(state): State<TenancyState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    attach_route_values(&mut parts).await;

    // Cancelled when this future is dropped (client went away).
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let outcome = state.resolve(&parts, &cancel).await;
    match outcome {
        Ok(ResolutionOutcome::Proceed(context)) => {
            debug!(tenant = %context, "Proceeding with tenant context");
            parts.extensions.insert(context);
            next.run(Request::from_parts(parts, body)).await
        }
        Ok(ResolutionOutcome::Rejected(rejection)) => {
            TenancyRejection::from(rejection).into_response()
        }
        Err(e) => TenancyRejection::from(e).into_response(),
    }
}

/// Copies the matched route's path parameters into [`RouteValues`].
///
/// Values already placed by an outer layer are kept.
async fn attach_route_values(parts: &mut Parts) {
    if parts.extensions.get::<RouteValues>().is_some() {
        return;
    }

    // `Path` percent-decodes, matching how query values are read.
    let params = Path::<HashMap<String, String>>::from_request_parts(parts, &()).await;
    if let Ok(Path(params)) = params {
        let values: RouteValues = params.into_iter().collect();
        if !values.is_empty() {
            parts.extensions.insert(values);
        }
    }
}
