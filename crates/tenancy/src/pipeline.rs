//! Per-request tenant resolution pipeline.
//!
//! A run moves through fixed stages:
//!
//! ```text
//! Start -> Resolving -> LookingUp -> Enforcing -> Populated -> Proceeding
//!                   \______________/           \-> Rejected
//! ```
//!
//! Resolution always precedes lookup, lookup precedes enforcement, and a
//! [`TenantContext`] exists only once enforcement has passed. A rejected
//! request never gets a context.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::builder::TenantPipelineBuilder;
use crate::context::{Resolution, TenantContext};
use crate::error::{Rejection, TenancyError, TenancyResult};
use crate::request::RequestContext;
use crate::resolver::TenantResolver;
use crate::store::TenantStore;

/// Enforcement switches applied after lookup.
///
/// The default is fully permissive: requests without a tenant, or with an
/// unknown one, proceed with an empty context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    /// Reject requests that carry no tenant identifier.
    pub require_tenant: bool,
    /// Reject requests whose identifier is unknown to the store.
    pub throw_on_tenant_not_found: bool,
}

impl ResolutionPolicy {
    /// Returns a policy that requires a tenant and rejects unknown ones.
    pub fn strict() -> Self {
        Self {
            require_tenant: true,
            throw_on_tenant_not_found: true,
        }
    }
}

/// Stage of a pipeline run, used in trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Invoking the resolver.
    Resolving,
    /// Looking the identifier up in the store.
    LookingUp,
    /// Applying the policy.
    Enforcing,
    /// The context was built.
    Populated,
    /// The policy refused the request.
    Rejected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolving => "resolving",
            Stage::LookingUp => "looking_up",
            Stage::Enforcing => "enforcing",
            Stage::Populated => "populated",
            Stage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Terminal result of a pipeline run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Downstream processing may continue with this context.
    Proceed(TenantContext),
    /// The policy refused the request; downstream must not run.
    Rejected(Rejection),
}

impl ResolutionOutcome {
    /// Returns true if the request may proceed.
    pub fn is_proceed(&self) -> bool {
        matches!(self, ResolutionOutcome::Proceed(_))
    }

    /// Converts the outcome into a `Result`.
    pub fn into_result(self) -> Result<TenantContext, Rejection> {
        match self {
            ResolutionOutcome::Proceed(context) => Ok(context),
            ResolutionOutcome::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Applies `policy` to the result of resolution and lookup.
///
/// This is the whole of the enforcement stage. An unknown identifier is
/// checked against `throw_on_tenant_not_found` only; `require_tenant` applies
/// when no identifier was resolved at all. An unknown identifier with
/// `throw_on_tenant_not_found` off always proceeds without a tenant.
pub fn enforce(
    policy: ResolutionPolicy,
    resolution: Resolution,
    path: &str,
) -> Result<TenantContext, Rejection> {
    let rejection = match &resolution {
        Resolution::Resolved { .. } => None,
        Resolution::NotFound { identifier } if policy.throw_on_tenant_not_found => {
            Some(Rejection::TenantNotFound {
                tenant_id: identifier.value().to_string(),
            })
        }
        Resolution::Anonymous if policy.require_tenant => {
            Some(Rejection::TenantRequired {
                path: path.to_string(),
            })
        }
        _ => None,
    };

    match rejection {
        Some(rejection) => Err(rejection),
        None => Ok(resolution.into()),
    }
}

/// Resolves, looks up, and enforces the tenant for each request.
///
/// The pipeline is immutable and cheap to clone; share one instance across
/// all requests.
#[derive(Clone)]
pub struct TenantPipeline {
    resolver: Arc<dyn TenantResolver>,
    store: Arc<dyn TenantStore>,
    policy: ResolutionPolicy,
}

impl TenantPipeline {
    /// Creates a pipeline from its parts.
    pub fn new(
        resolver: Arc<dyn TenantResolver>,
        store: Arc<dyn TenantStore>,
        policy: ResolutionPolicy,
    ) -> Self {
        Self {
            resolver,
            store,
            policy,
        }
    }

    /// Starts a fluent builder.
    pub fn builder() -> TenantPipelineBuilder {
        TenantPipelineBuilder::new()
    }

    /// Returns the resolver.
    pub fn resolver(&self) -> &Arc<dyn TenantResolver> {
        &self.resolver
    }

    /// Returns the store.
    pub fn store(&self) -> &Arc<dyn TenantStore> {
        &self.store
    }

    /// Returns the enforcement policy.
    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Runs the pipeline for one request.
    ///
    /// Returns [`ResolutionOutcome::Proceed`] with a complete context, or
    /// [`ResolutionOutcome::Rejected`] when the policy refuses the request.
    ///
    /// # Errors
    ///
    /// * `TenancyError::Store` - the store failed; the failure is not
    ///   reinterpreted as "not found"
    /// * `TenancyError::Cancelled` - `cancel` fired before the run finished
    pub async fn run(
        &self,
        request: &dyn RequestContext,
        cancel: &CancellationToken,
    ) -> TenancyResult<ResolutionOutcome> {
        let path = request.path();

        debug!(stage = %Stage::Resolving, path, source = %self.resolver.source(), "Resolving tenant");
        let identifier = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(Stage::Resolving, path)),
            identifier = self.resolver.resolve_identifier(request, cancel) => identifier,
        };

        let resolution = match identifier {
            None => {
                debug!(stage = %Stage::Enforcing, path, "No tenant identifier resolved");
                Resolution::Anonymous
            }
            Some(identifier) => {
                debug!(
                    stage = %Stage::LookingUp,
                    tenant_id = identifier.value(),
                    source = %identifier.source(),
                    backend = self.store.backend_name(),
                    "Looking up tenant"
                );
                let found = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(cancelled(Stage::LookingUp, path)),
                    found = self.store.find_by_id(identifier.value(), cancel) => found,
                };

                match found {
                    Ok(Some(tenant)) => Resolution::Resolved { tenant, identifier },
                    Ok(None) => {
                        debug!(tenant_id = identifier.value(), "Tenant not found in store");
                        Resolution::NotFound { identifier }
                    }
                    Err(e) => {
                        error!(
                            tenant_id = identifier.value(),
                            backend = self.store.backend_name(),
                            error = %e,
                            "Tenant store lookup failed"
                        );
                        return Err(TenancyError::Store(e));
                    }
                }
            }
        };

        match enforce(self.policy, resolution, path) {
            Ok(context) => {
                debug!(stage = %Stage::Populated, path, tenant = %context, "Tenant context populated");
                Ok(ResolutionOutcome::Proceed(context))
            }
            Err(rejection) => {
                warn!(stage = %Stage::Rejected, path, reason = %rejection, "Tenant resolution rejected request");
                Ok(ResolutionOutcome::Rejected(rejection))
            }
        }
    }
}

impl fmt::Debug for TenantPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantPipeline")
            .field("source", &self.resolver.source())
            .field("store", &self.store.backend_name())
            .field("policy", &self.policy)
            .finish()
    }
}

fn cancelled(stage: Stage, path: &str) -> TenancyError {
    debug!(%stage, path, "Tenant resolution cancelled");
    TenancyError::Cancelled
}
