//! ServerBuilder for fluent API to build HTTP servers

use super::router::build_routes;
use super::state::AppState;
use crate::config::ServiceConfig;
use crate::services::{CatalogService, ContactService, ProfileService, Stores};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the HTTP server
///
/// Without [`with_stores`](Self::with_stores) every resource lives in an
/// empty in-memory store.
///
/// # Example
///
/// ```ignore
/// let stores = Stores::in_memory();
/// seed_demo_data(&stores).await?;
/// let app = ServerBuilder::new(config).with_stores(stores).build()?;
/// ```
pub struct ServerBuilder {
    config: ServiceConfig,
    stores: Stores,
}

impl ServerBuilder {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            stores: Stores::in_memory(),
        }
    }

    pub fn with_stores(mut self, stores: Stores) -> Self {
        self.stores = stores;
        self
    }

    /// Validate the configuration and wire the services
    pub fn build_state(self) -> Result<AppState> {
        self.config.validate()?;
        let codec = Arc::new(self.config.cursor_codec()?);

        let profiles =
            ProfileService::new(self.stores.clone(), codec).with_limits(self.config.pagination);
        let contacts = ContactService::new(self.stores.clone());
        let catalog = CatalogService::new(self.stores);

        Ok(AppState::new(
            profiles,
            contacts,
            catalog,
            &self.config.server.base_url(),
        ))
    }

    /// Build the router
    pub fn build(self) -> Result<Router> {
        Ok(build_routes(self.build_state()?))
    }

    /// Bind the configured address and serve until a shutdown signal
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind_address();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
