//! Observation service: normalized readings with fallback substitution
//!
//! Wraps the raw WeatherXM client behind a contract that never fails:
//! when every endpoint shape errors out, the caller receives a synthetic
//! baseline reading marked `Provenance::Fallback` instead of an error.
//! Readings are kept in a latest-wins store keyed by station id.

use chrono::Utc;
use futures::future::join_all;
use std::collections::HashMap;
use tokio::sync::RwLock;

use shared::{PolicyRecommendation, RiskAssessment, WeatherReading};

use crate::external::weatherxm::{extract_observation, extract_reading};
use crate::external::WeatherXmClient;

/// Observation service for fetching and caching normalized readings
pub struct ObservationService {
    client: WeatherXmClient,
    store: RwLock<HashMap<String, WeatherReading>>,
}

impl ObservationService {
    pub fn new(client: WeatherXmClient) -> Self {
        Self {
            client,
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch the most recent reading for a station. Never errors: on total
    /// endpoint failure a fallback reading is produced and stored, so the
    /// pipeline downstream always has something to work with.
    pub async fn latest_reading(&self, station_id: &str) -> WeatherReading {
        let now_ms = Utc::now().timestamp_millis();

        let reading = match self.client.raw_latest_observation(station_id).await {
            Ok(body) => extract_reading(station_id, &body, now_ms),
            Err(e) => {
                tracing::warn!(station_id, error = %e, "all observation endpoints failed, using fallback");
                WeatherReading::fallback(station_id, now_ms)
            }
        };

        self.store
            .write()
            .await
            .insert(station_id.to_string(), reading.clone());
        reading
    }

    /// Fan-out fetch for many stations. All branches settle independently;
    /// a failure in one (already degraded to fallback) cancels nothing.
    pub async fn latest_readings(&self, station_ids: &[String]) -> Vec<WeatherReading> {
        let fetches = station_ids.iter().map(|id| self.latest_reading(id));
        join_all(fetches).await
    }

    /// Historical readings for the past `days` days. Falls back to the
    /// single latest reading when no historical series is available.
    pub async fn historical_readings(&self, station_id: &str, days: u32) -> Vec<WeatherReading> {
        let now_ms = Utc::now().timestamp_millis();

        match self.client.raw_historical_observations(station_id, days).await {
            Ok(body) => match body.as_array() {
                Some(items) if !items.is_empty() => items
                    .iter()
                    .map(|obs| extract_observation(station_id, obs, now_ms))
                    .collect(),
                _ => vec![self.latest_reading(station_id).await],
            },
            Err(e) => {
                tracing::warn!(station_id, error = %e, "no historical data, using latest");
                vec![self.latest_reading(station_id).await]
            }
        }
    }

    /// Last stored reading for a station, if any.
    pub async fn reading(&self, station_id: &str) -> Option<WeatherReading> {
        self.store.read().await.get(station_id).cloned()
    }

    /// All stored readings.
    pub async fn readings(&self) -> Vec<WeatherReading> {
        self.store.read().await.values().cloned().collect()
    }

    /// Risk assessment for a station, recomputed from the stored reading.
    pub async fn risk_assessment(&self, station_id: &str) -> RiskAssessment {
        match self.reading(station_id).await {
            Some(reading) => RiskAssessment::from_reading(&reading),
            None => RiskAssessment::unknown(),
        }
    }

    /// Policy recommendation for a station and crop type.
    pub async fn policy_recommendation(
        &self,
        station_id: &str,
        crop_type: &str,
    ) -> PolicyRecommendation {
        let assessment = self.risk_assessment(station_id).await;
        PolicyRecommendation::from_assessment(&assessment, crop_type)
    }
}
