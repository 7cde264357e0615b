//! Demo endpoints.

use axum::{Json, extract::State, http::StatusCode};
use helios_tenancy::Tenant;
use helios_tenancy_axum::{CurrentTenant, RequiredTenant, TenancyRejection};
use serde_json::{Value, json};

use crate::AppState;

/// `GET /` - service banner. Public.
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "Helios Tenancy Demo API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "Pass the X-Tenant-Id header or ?tenant= query param to identify your tenant"
    }))
}

/// `GET /health` - liveness probe. Public.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// `GET /info` - the resolved tenant, or an anonymous notice.
pub async fn info(CurrentTenant(ctx): CurrentTenant) -> Json<Value> {
    match ctx.current() {
        Some(tenant) => Json(json!({
            "id": tenant.id(),
            "name": tenant.name(),
            "metadata": tenant.metadata(),
        })),
        None => Json(json!({
            "tenant": Value::Null,
            "identifier": ctx.identifier().map(|i| i.value()),
            "message": "Anonymous request - no tenant resolved",
        })),
    }
}

/// `GET /data` - per-tenant records.
pub async fn data(
    tenant: Result<RequiredTenant, TenancyRejection>,
) -> Result<Json<Value>, StatusCode> {
    let RequiredTenant(tenant) = tenant.map_err(|_| StatusCode::UNAUTHORIZED)?;
    let records = records_for(&tenant);

    Ok(Json(json!({
        "tenant": tenant.id(),
        "records": records,
        "count": records.len(),
    })))
}

/// `GET /features` - feature flags derived from the tenant's plan.
pub async fn features(
    tenant: Result<RequiredTenant, TenancyRejection>,
) -> Result<Json<Value>, StatusCode> {
    let RequiredTenant(tenant) = tenant.map_err(|_| StatusCode::UNAUTHORIZED)?;
    let plan = tenant.metadata_value("plan").unwrap_or("free");

    Ok(Json(json!({
        "tenant": tenant.id(),
        "plan": plan,
        "features": features_for_plan(plan),
    })))
}

/// `GET /admin/tenants` - every tenant the store knows. Public.
pub async fn list_tenants(State(state): State<AppState>) -> Result<Json<Value>, TenancyRejection> {
    let tenants: Vec<Tenant> = state
        .catalog
        .list_tenants()
        .await?
        .iter()
        .map(|t| t.as_ref().clone())
        .collect();

    Ok(Json(json!({
        "count": tenants.len(),
        "tenants": tenants,
    })))
}

fn records_for(tenant: &Tenant) -> &'static [&'static str] {
    match tenant.id() {
        "acme" => &["Widget A", "Widget B", "Widget C"],
        "globex" => &["Product X", "Product Y"],
        "initech" => &["Item Alpha"],
        _ => &[],
    }
}

fn features_for_plan(plan: &str) -> &'static [&'static str] {
    match plan {
        "enterprise" => &[
            "SSO",
            "Audit Logs",
            "Custom Domain",
            "SLA 99.99%",
            "Dedicated Support",
        ],
        "professional" => &["SSO", "Audit Logs", "Custom Domain"],
        "starter" => &["Standard Support"],
        _ => &["Limited Access"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_for_plan() {
        assert_eq!(features_for_plan("enterprise").len(), 5);
        assert_eq!(features_for_plan("starter"), &["Standard Support"]);
        assert_eq!(features_for_plan("unknown"), &["Limited Access"]);
    }

    #[test]
    fn test_records_for_unknown_tenant() {
        assert!(records_for(&Tenant::new("hooli", "Hooli")).is_empty());
        assert_eq!(records_for(&Tenant::new("globex", "Globex Inc")).len(), 2);
    }
}
