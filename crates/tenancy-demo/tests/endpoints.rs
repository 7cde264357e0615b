//! End-to-end tests for the demo API.

use std::io::Write;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use helios_tenancy_axum::ResolverKind;
use helios_tenancy_demo::{DemoConfig, create_app};
use serde_json::Value;

const X_TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");

fn server(config: &DemoConfig) -> TestServer {
    let app = create_app(config).expect("demo app should build");
    TestServer::new(app).expect("Failed to create test server")
}

fn default_server() -> TestServer {
    server(&DemoConfig::for_testing())
}

#[tokio::test]
async fn test_root_is_public() {
    let response = default_server().get("/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["service"], "Helios Tenancy Demo API");
}

#[tokio::test]
async fn test_health_is_public() {
    let response = default_server().get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_info_from_header() {
    let response = default_server()
        .get("/info")
        .add_header(X_TENANT_ID, HeaderValue::from_static("acme"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "acme");
    assert_eq!(body["name"], "Acme Corp");
    assert_eq!(body["metadata"]["region"], "eu-west-1");
}

#[tokio::test]
async fn test_info_from_query() {
    let response = default_server()
        .get("/info")
        .add_query_param("tenant", "globex")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], "globex");
}

#[tokio::test]
async fn test_default_config_accepts_query_param() {
    let response = server(&DemoConfig::default())
        .get("/info")
        .add_query_param("tenant", "globex")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], "globex");
}

#[tokio::test]
async fn test_info_header_wins_over_query() {
    let response = default_server()
        .get("/info")
        .add_header(X_TENANT_ID, HeaderValue::from_static("initech"))
        .add_query_param("tenant", "globex")
        .await;

    assert_eq!(response.json::<Value>()["id"], "initech");
}

#[tokio::test]
async fn test_info_anonymous() {
    let response = default_server().get("/info").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["tenant"].is_null());
    assert!(body["identifier"].is_null());
}

#[tokio::test]
async fn test_info_unknown_tenant_is_anonymous() {
    let response = default_server()
        .get("/info")
        .add_header(X_TENANT_ID, HeaderValue::from_static("unknown-xyz"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["tenant"].is_null());
    assert_eq!(body["identifier"], "unknown-xyz");
}

#[tokio::test]
async fn test_data_requires_tenant() {
    let response = default_server().get("/data").await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_data_for_tenant() {
    let response = default_server()
        .get("/data")
        .add_header(X_TENANT_ID, HeaderValue::from_static("acme"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["tenant"], "acme");
    assert_eq!(body["count"], 3);
    assert_eq!(body["records"][0], "Widget A");
}

#[tokio::test]
async fn test_features_follow_plan() {
    let server = default_server();

    let enterprise: Value = server
        .get("/features")
        .add_header(X_TENANT_ID, HeaderValue::from_static("acme"))
        .await
        .json();
    assert_eq!(enterprise["plan"], "enterprise");
    assert_eq!(enterprise["features"].as_array().map(Vec::len), Some(5));

    let starter: Value = server
        .get("/features")
        .add_query_param("tenant", "globex")
        .await
        .json();
    assert_eq!(starter["plan"], "starter");
    assert_eq!(starter["features"][0], "Standard Support");
}

#[tokio::test]
async fn test_features_unknown_tenant_unauthorized() {
    let response = default_server()
        .get("/features")
        .add_header(X_TENANT_ID, HeaderValue::from_static("hooli"))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_admin_lists_tenants() {
    let response = default_server().get("/admin/tenants").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 3);
    let ids: Vec<&str> = body["tenants"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["acme", "globex", "initech"]);
}

#[tokio::test]
async fn test_require_tenant_policy_rejects_before_handler() {
    let mut config = DemoConfig::for_testing();
    config.tenancy.require_tenant = true;

    let response = server(&config).get("/info").await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"], "tenant-required");
}

#[tokio::test]
async fn test_require_tenant_leaves_public_routes_open() {
    let mut config = DemoConfig::for_testing();
    config.tenancy.require_tenant = true;

    server(&config).get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_throw_on_not_found_policy() {
    let mut config = DemoConfig::for_testing();
    config.tenancy.throw_on_tenant_not_found = true;

    let response = server(&config)
        .get("/info")
        .add_header(X_TENANT_ID, HeaderValue::from_static("unknown-xyz"))
        .await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"], "tenant-not-found");
}

#[tokio::test]
async fn test_header_only_ignores_query() {
    let mut config = DemoConfig::for_testing();
    config.tenancy.resolvers = vec![ResolverKind::Header];

    let response = server(&config)
        .get("/info")
        .add_query_param("tenant", "globex")
        .await;

    assert!(response.json::<Value>()["tenant"].is_null());
}

#[tokio::test]
async fn test_seed_file_replaces_default_tenants() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id": "umbrella", "name": "Umbrella Corp", "metadata": {{"plan": "professional"}}}}]"#
    )
    .unwrap();

    let mut config = DemoConfig::for_testing();
    config.seed_file = Some(file.path().to_path_buf());
    let server = server(&config);

    let body: Value = server
        .get("/features")
        .add_header(X_TENANT_ID, HeaderValue::from_static("umbrella"))
        .await
        .json();
    assert_eq!(body["plan"], "professional");

    let acme: Value = server
        .get("/info")
        .add_header(X_TENANT_ID, HeaderValue::from_static("acme"))
        .await
        .json();
    assert!(acme["tenant"].is_null());
}

#[test]
fn test_duplicate_seed_fails_to_build() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id": "acme", "name": "One"}}, {{"id": "ACME", "name": "Two"}}]"#
    )
    .unwrap();

    let mut config = DemoConfig::for_testing();
    config.seed_file = Some(file.path().to_path_buf());

    assert!(create_app(&config).is_err());
}
