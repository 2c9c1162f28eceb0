//! Insurance ledger operations
//!
//! Everything that moves money or feeds the on-chain oracle lives here.
//! Unlike weather discovery, ledger failures are never swallowed: single
//! submissions propagate errors, and bulk submissions report per-item
//! outcomes so a partial failure stays visible to the caller.

use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Duration;

use shared::{validate_policy_amounts, validate_reading, PolicyInfo, PoolStats, WeatherReading};

use crate::error::{AppError, AppResult};
use crate::external::flow::{cadence, CadenceArg};
use crate::external::FlowClient;

/// Pause between sequential bulk submissions to stay under gateway rate
/// limits.
const BULK_PACING: Duration = Duration::from_secs(1);

/// Tag recorded on-chain as the origin of every weather update.
const DATA_SOURCE: &str = "WeatherXM";

/// Outcome of a bulk weather push: successes and failures side by side.
#[derive(Debug, Default)]
pub struct BulkUpdateOutcome {
    /// Transaction ids of accepted updates
    pub submitted: Vec<String>,
    /// Station id and error message per rejected update
    pub failed: Vec<(String, String)>,
}

/// Insurance service for on-chain reads and writes
#[derive(Clone)]
pub struct InsuranceService {
    flow: FlowClient,
}

impl InsuranceService {
    pub fn new(flow: FlowClient) -> Self {
        Self { flow }
    }

    /// Push one validated reading to the oracle contract.
    ///
    /// Invalid readings are rejected outright, never coerced into range.
    pub async fn update_weather_on_chain(&self, reading: &WeatherReading) -> AppResult<String> {
        validate_reading(reading).map_err(|msg| AppError::validation("reading", msg))?;

        let args = vec![
            CadenceArg::string(&reading.station_id),
            CadenceArg::ufix64(reading.rainfall_mm),
            CadenceArg::ufix64(reading.temperature_c),
            CadenceArg::ufix64(reading.humidity_pct),
            CadenceArg::ufix64(reading.wind_speed_kmh),
            CadenceArg::string(DATA_SOURCE),
        ];

        let tx_id = self
            .flow
            .submit_transaction(cadence::UPDATE_WEATHER_DATA, args)
            .await?;

        tracing::info!(station_id = %reading.station_id, tx_id = %tx_id, "weather updated on chain");
        Ok(tx_id)
    }

    /// Push a batch of readings sequentially with pacing.
    ///
    /// Each item's failure is collected, not swallowed; the caller decides
    /// what a partial outcome means.
    pub async fn bulk_update_weather(&self, readings: &[WeatherReading]) -> BulkUpdateOutcome {
        let mut outcome = BulkUpdateOutcome::default();

        for (i, reading) in readings.iter().enumerate() {
            match self.update_weather_on_chain(reading).await {
                Ok(tx_id) => outcome.submitted.push(tx_id),
                Err(e) => {
                    tracing::warn!(station_id = %reading.station_id, error = %e, "bulk update item failed");
                    outcome.failed.push((reading.station_id.clone(), e.to_string()));
                }
            }
            if i + 1 < readings.len() {
                tokio::time::sleep(BULK_PACING).await;
            }
        }

        tracing::info!(
            submitted = outcome.submitted.len(),
            failed = outcome.failed.len(),
            "bulk weather update finished"
        );
        outcome
    }

    /// Register a new insurance policy for a location and crop.
    pub async fn register_policy(
        &self,
        location_id: &str,
        crop_type: &str,
        coverage_amount: Decimal,
        premium_amount: Decimal,
    ) -> AppResult<String> {
        if location_id.is_empty() {
            return Err(AppError::validation(
                "location_id",
                "Station id must not be empty",
            ));
        }
        validate_policy_amounts(coverage_amount, premium_amount)
            .map_err(|msg| AppError::validation("policy", msg))?;

        let args = vec![
            CadenceArg::string(location_id),
            CadenceArg::string(crop_type),
            CadenceArg::ufix64_decimal(coverage_amount),
            CadenceArg::ufix64_decimal(premium_amount),
        ];

        self.flow
            .submit_transaction(cadence::REGISTER_POLICY, args)
            .await
    }

    /// Ask the pool contract to evaluate trigger conditions for all active
    /// policies against current oracle data.
    pub async fn check_trigger_conditions(&self) -> AppResult<String> {
        self.flow
            .submit_transaction(cadence::CHECK_TRIGGERS, Vec::new())
            .await
    }

    /// Active policies registered by a user.
    pub async fn user_policies(&self, address: &str) -> AppResult<Vec<PolicyInfo>> {
        let result = self
            .flow
            .execute_script(cadence::GET_USER_POLICIES, vec![CadenceArg::address(address)])
            .await?;

        serde_json::from_value(result)
            .map_err(|e| AppError::Ledger(format!("unexpected policy list shape: {}", e)))
    }

    /// Liquidity pool statistics.
    pub async fn pool_stats(&self) -> AppResult<PoolStats> {
        let result = self
            .flow
            .execute_script(cadence::GET_POOL_STATS, Vec::new())
            .await?;

        serde_json::from_value(result)
            .map_err(|e| AppError::Ledger(format!("unexpected pool stats shape: {}", e)))
    }

    /// Raw on-chain weather history for a location, as the contract stores it.
    pub async fn weather_on_chain(&self, location_id: &str) -> AppResult<Value> {
        self.flow
            .execute_script(
                cadence::GET_WEATHER_DATA,
                vec![CadenceArg::string(location_id)],
            )
            .await
    }
}
