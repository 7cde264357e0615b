//! Tenant seed data.

use std::fs;
use std::path::Path;

use anyhow::Context;
use helios_tenancy::Tenant;
use tracing::info;

/// Returns the built-in demo tenants.
pub fn default_tenants() -> Vec<Tenant> {
    vec![
        Tenant::with_metadata(
            "acme",
            "Acme Corp",
            [
                ("plan", "enterprise"),
                ("region", "eu-west-1"),
                ("theme", "dark"),
            ],
        ),
        Tenant::with_metadata(
            "globex",
            "Globex Inc",
            [
                ("plan", "starter"),
                ("region", "us-east-1"),
                ("theme", "light"),
            ],
        ),
        Tenant::with_metadata(
            "initech",
            "Initech Ltd",
            [
                ("plan", "professional"),
                ("region", "ap-southeast-1"),
                ("theme", "system"),
            ],
        ),
    ]
}

/// Reads a JSON array of tenants from `path`.
///
/// ```json
/// [{ "id": "acme", "name": "Acme Corp", "metadata": { "plan": "enterprise" } }]
/// ```
pub fn load_seed_file(path: &Path) -> anyhow::Result<Vec<Tenant>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let tenants: Vec<Tenant> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid tenant seed in {}", path.display()))?;

    info!(path = %path.display(), count = tenants.len(), "Loaded tenant seed file");
    Ok(tenants)
}

/// Loads tenants from `path`, or the built-in set when no file is given.
pub fn load_tenants(path: Option<&Path>) -> anyhow::Result<Vec<Tenant>> {
    match path {
        Some(path) => load_seed_file(path),
        None => Ok(default_tenants()),
    }
}
