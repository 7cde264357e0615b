//! Demo server configuration.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DEMO_SERVER_PORT` | 8080 | Server port |
//! | `DEMO_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `DEMO_LOG_LEVEL` | info | Log level |
//! | `DEMO_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `TENANCY_SEED_FILE` | (built-in tenants) | JSON array of tenants to load |
//!
//! Tenant resolution settings (`TENANCY_*`) come from
//! [`TenancyConfig`].

use std::path::PathBuf;

use clap::Parser;
use helios_tenancy_axum::{ResolverKind, TenancyConfig};

/// Demo server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "tenancy-demo")]
#[command(about = "Multi-tenant demo API")]
pub struct DemoConfig {
    /// Port to listen on.
    #[arg(short, long, env = "DEMO_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "DEMO_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "DEMO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "DEMO_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// JSON file with the tenants to serve.
    #[arg(long, env = "TENANCY_SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Tenant resolution settings.
    #[command(flatten)]
    pub tenancy: TenancyConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            seed_file: None,
            tenancy: TenancyConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Err(tenancy_errors) = self.tenancy.validate() {
            errors.extend(tenancy_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Resolves from the header first, then the query string.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            tenancy: TenancyConfig {
                resolvers: vec![ResolverKind::Header, ResolverKind::Query],
                ..TenancyConfig::default()
            },
            ..Self::default()
        }
    }
}
