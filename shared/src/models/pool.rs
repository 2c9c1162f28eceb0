//! Liquidity pool statistics

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for the insurance liquidity pool, as reported by the
/// on-chain pool contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub total_liquidity: Decimal,
    pub total_policies: u64,
    pub total_payouts: Decimal,
    #[serde(deserialize_with = "rate_from_number_or_string")]
    pub utilization_rate: f64,
}

/// The contract reports the rate as a Cadence `UFix64`, which arrives as a
/// decimal string; plain JSON sources send a number. Accept both.
fn rate_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
