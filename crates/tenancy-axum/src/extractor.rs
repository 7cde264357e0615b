//! Tenant context extractors.

use std::ops::Deref;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use helios_tenancy::{Rejection, Tenant, TenantContext};
use http::request::Parts;

use crate::error::TenancyRejection;

/// Axum extractor for the request's [`TenantContext`].
///
/// Always succeeds on routes behind the tenant middleware; the context may
/// or may not hold a tenant depending on the policy.
///
/// # Example
///
/// ```rust,ignore
/// use helios_tenancy_axum::CurrentTenant;
///
/// async fn handler(CurrentTenant(ctx): CurrentTenant) -> String {
///     ctx.tenant_id().unwrap_or("none").to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub TenantContext);

impl Deref for CurrentTenant {
    type Target = TenantContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = TenancyRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .map(CurrentTenant)
            .ok_or(TenancyRejection::MissingContext)
    }
}

/// Axum extractor that insists on a resolved tenant.
///
/// Rejects with `400 tenant-required` when the request has no tenant, even
/// if the pipeline policy let it through.
#[derive(Debug, Clone)]
pub struct RequiredTenant(pub Arc<Tenant>);

impl Deref for RequiredTenant {
    type Target = Tenant;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequiredTenant
where
    S: Send + Sync,
{
    type Rejection = TenancyRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentTenant(context) = CurrentTenant::from_request_parts(parts, state).await?;
        match context.current() {
            Some(tenant) => Ok(RequiredTenant(Arc::clone(tenant))),
            None => Err(Rejection::TenantRequired {
                path: parts.uri.path().to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use helios_tenancy::{ResolvedIdentifier, TenantSource};
    use http::Request;

    fn parts_with(context: Option<TenantContext>) -> Parts {
        let (mut parts, _) = Request::builder()
            .uri("/data")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        if let Some(context) = context {
            parts.extensions.insert(context);
        }
        parts
    }

    fn acme() -> TenantContext {
        TenantContext::resolved(
            Arc::new(Tenant::new("acme", "Acme Corp")),
            ResolvedIdentifier::new("acme", TenantSource::Header),
        )
    }

    #[tokio::test]
    async fn test_current_tenant() {
        let mut parts = parts_with(Some(acme()));
        let current = CurrentTenant::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(current.tenant_id(), Some("acme"));
    }

    #[tokio::test]
    async fn test_current_tenant_without_middleware() {
        let mut parts = parts_with(None);
        let err = CurrentTenant::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, TenancyRejection::MissingContext));
    }

    #[tokio::test]
    async fn test_required_tenant() {
        let mut parts = parts_with(Some(acme()));
        let tenant = RequiredTenant::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(tenant.name(), "Acme Corp");
    }

    #[tokio::test]
    async fn test_required_tenant_rejects_anonymous() {
        let mut parts = parts_with(Some(TenantContext::anonymous()));
        let err = RequiredTenant::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
