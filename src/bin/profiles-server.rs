//! Profiles HTTP server
//!
//! Configuration is read from `$PROFILES_CONFIG`, else `config/profiles.yaml`
//! when it exists, else defaults; environment variables override both.

use anyhow::Result;
use profiles::config::ServiceConfig;
use profiles::server::ServerBuilder;
use profiles::services::Stores;
use profiles::storage::seed_demo_data;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/profiles.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = load_config()?;
    config.apply_env()?;

    let stores = Stores::in_memory();
    seed_demo_data(&stores).await?;

    ServerBuilder::new(config).with_stores(stores).serve().await
}

fn load_config() -> Result<ServiceConfig> {
    if let Ok(path) = std::env::var("PROFILES_CONFIG") {
        tracing::info!(path = %path, "loading configuration");
        return ServiceConfig::from_yaml_file(path);
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        tracing::info!(path = DEFAULT_CONFIG_PATH, "loading configuration");
        return ServiceConfig::from_yaml_file(DEFAULT_CONFIG_PATH);
    }
    tracing::info!("no configuration file, using defaults");
    Ok(ServiceConfig::default())
}
