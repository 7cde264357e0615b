//! Helios Tenancy demo server.

use clap::Parser;
use helios_tenancy_axum::init_logging;
use helios_tenancy_demo::{DemoConfig, create_app};
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &DemoConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DemoConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        resolvers = ?config.tenancy.resolvers,
        require_tenant = config.tenancy.require_tenant,
        throw_on_tenant_not_found = config.tenancy.throw_on_tenant_not_found,
        "Starting Helios Tenancy demo"
    );

    let app = create_app(&config)?;
    serve(app, &config).await
}
