pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;

use crate::config::Config;
use crate::provider::RateProvider;
use std::net::SocketAddr;
use std::sync::Arc;

/// Read-only state shared by every request.
pub struct AppState {
    pub provider: Arc<dyn RateProvider>,
}

pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self {
            state: Arc::new(AppState { provider }),
        }
    }

    /// Binds the configured address and serves until Ctrl+C.
    pub async fn run(self, config: &Config) -> anyhow::Result<()> {
        let app = router::build(Arc::clone(&self.state), &config.static_dir);
        let addr = config.addr();

        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("API server listening on http://{}", addr);
        tracing::info!("serving static files from {}", config.static_dir.display());
        tracing::info!("  GET  /                - landing page");
        tracing::info!("  GET  /api/convert     - currency conversion");
        tracing::info!("  GET  /api/currencies  - supported currencies");
        tracing::info!("  GET  /api/health      - health check");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
