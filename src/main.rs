mod api;
mod config;
mod errors;
mod models;
mod provider;

use api::ApiServer;
use config::{Config, LogFormat};
use provider::ExchangeRateApi;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }

    if config.api_key.is_empty() {
        tracing::warn!("EXCHANGE_API_KEY is not set; the provider will reject every call");
    }

    let provider = ExchangeRateApi::new(&config)?;
    tracing::info!(
        "Currency converter starting on port {} (upstream timeout {:?})",
        config.api_port,
        config.upstream_timeout
    );

    ApiServer::new(Arc::new(provider)).run(&config).await
}
