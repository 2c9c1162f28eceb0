//! MicroCrop Weather Risk Oracle
//!
//! Long-running service that discovers WeatherXM stations for the deployment
//! region, polls their observations, scores crop risk, and feeds validated
//! readings to the on-chain oracle contract.

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::{FlowClient, WeatherXmClient};
use services::{InsuranceService, ObservationService, StationService, WeatherSyncService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "microcrop_oracle=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    config.validate()?;

    tracing::info!("Starting MicroCrop Weather Risk Oracle");
    tracing::info!("Environment: {}", config.environment);

    let weatherxm = WeatherXmClient::with_base_url(
        config.weatherxm.api_key.clone(),
        config.weatherxm.base_url.clone(),
    )
    .with_timeout(Duration::from_secs(config.weatherxm.timeout_seconds));
    let flow = FlowClient::new(&config.flow);

    // Resolve the station set once at startup; discovery degrades gracefully
    // so an empty result here means a configuration or upstream problem.
    let stations = StationService::new(weatherxm.clone(), config.weatherxm.region.bounds());
    let station_ids = stations.resolve_region_stations().await;
    if station_ids.is_empty() {
        tracing::warn!("no stations resolved for region; oracle will idle until restart");
    }

    let observations = Arc::new(ObservationService::new(weatherxm));
    let insurance = Arc::new(InsuranceService::new(flow));

    // Prime the reading store before the first scheduled poll
    let readings = observations.latest_readings(&station_ids).await;
    tracing::info!(count = readings.len(), "initial observations fetched");

    let sync = WeatherSyncService::new(
        Arc::clone(&observations),
        Arc::clone(&insurance),
        station_ids,
        Duration::from_secs(config.sync.poll_interval_seconds),
        Duration::from_secs(config.sync.chain_sync_interval_seconds),
    );
    let sync_handle = sync.spawn();

    tracing::info!(
        poll_interval = config.sync.poll_interval_seconds,
        chain_sync_interval = config.sync.chain_sync_interval_seconds,
        "sync loop running"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, stopping sync loop");
    sync_handle.shutdown();

    Ok(())
}
