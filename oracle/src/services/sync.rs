//! Periodic weather sync
//!
//! One spawned task owns the whole poll loop: refresh readings on every
//! tick, push fresh live readings on chain on the slower chain-sync cadence.
//! Because an iteration runs inline before the next tick is honored,
//! overlapping polls cannot happen even when an iteration outlives the
//! interval. Cancellation is guaranteed through `SyncHandle`, which aborts
//! the task on shutdown and on drop.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::services::{InsuranceService, ObservationService};

/// Periodic weather sync service
pub struct WeatherSyncService {
    observations: Arc<ObservationService>,
    insurance: Arc<InsuranceService>,
    station_ids: Vec<String>,
    poll_interval: Duration,
    chain_sync_interval: Duration,
}

/// Handle to a running sync loop. Dropping the handle stops the loop.
pub struct SyncHandle {
    handle: JoinHandle<()>,
}

impl SyncHandle {
    /// Stop the sync loop.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl WeatherSyncService {
    pub fn new(
        observations: Arc<ObservationService>,
        insurance: Arc<InsuranceService>,
        station_ids: Vec<String>,
        poll_interval: Duration,
        chain_sync_interval: Duration,
    ) -> Self {
        Self {
            observations,
            insurance,
            station_ids,
            poll_interval,
            chain_sync_interval,
        }
    }

    /// Start the poll loop on the runtime and return its handle.
    pub fn spawn(self) -> SyncHandle {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(self.poll_interval);
            // A long iteration delays the next tick instead of stacking
            // overlapping runs.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut last_chain_sync = Instant::now();

            loop {
                ticker.tick().await;
                self.poll_once().await;

                if last_chain_sync.elapsed() >= self.chain_sync_interval {
                    self.chain_sync_once().await;
                    last_chain_sync = Instant::now();
                }
            }
        });

        SyncHandle { handle }
    }

    /// One poll iteration: refresh every tracked station.
    async fn poll_once(&self) {
        tracing::debug!(stations = self.station_ids.len(), "polling observations");
        let readings = self.observations.latest_readings(&self.station_ids).await;

        let live = readings.iter().filter(|r| r.is_live()).count();
        tracing::info!(
            total = readings.len(),
            live,
            degraded = readings.len() - live,
            "observation poll finished"
        );
    }

    /// One chain-sync iteration: push live readings fresh enough to matter.
    ///
    /// Fallback readings never go on chain; they carry no information the
    /// contract should act on.
    async fn chain_sync_once(&self) {
        let cutoff_ms =
            chrono::Utc::now().timestamp_millis() - self.chain_sync_interval.as_millis() as i64;

        let fresh: Vec<_> = self
            .observations
            .readings()
            .await
            .into_iter()
            .filter(|r| r.is_live() && r.observed_at_ms >= cutoff_ms)
            .collect();

        if fresh.is_empty() {
            tracing::debug!("no fresh live readings to sync on chain");
            return;
        }

        let outcome = self.insurance.bulk_update_weather(&fresh).await;
        if !outcome.failed.is_empty() {
            tracing::warn!(
                failed = outcome.failed.len(),
                "some on-chain weather updates failed"
            );
        }
    }
}
