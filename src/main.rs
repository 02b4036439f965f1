//! Payroll engine HTTP server.

use std::env;
use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::repository::InMemoryRepository;

const DEFAULT_CONFIG_DIR: &str = "./config";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    if let Err(err) = start().await {
        error!(error = %err, "Payroll server stopped");
        return Err(err);
    }
    Ok(())
}

async fn start() -> Result<(), Box<dyn Error>> {
    let config_dir =
        env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;
    let repository = InMemoryRepository::load_from_dir(config.data_dir())?;

    let bind_address =
        env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| config.bind_address().to_string());
    info!(
        config_dir = %config_dir,
        organization = %config.organization_name(),
        week_start_day = %config.week_start_day(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config, Arc::new(repository)));
    let listener = TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Listening");

    axum::serve(listener, router).await?;
    Ok(())
}
