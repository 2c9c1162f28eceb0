//! Canonical weather reading model
//!
//! Upstream observation payloads arrive in several shapes; the oracle service
//! normalizes them into `WeatherReading` before anything else looks at them.

use serde::{Deserialize, Serialize};

/// Regional baseline defaults used when upstream fields are missing or the
/// upstream is unreachable. These reflect the expected climate profile of the
/// Kenyan deployment region, not global zeros.
pub const BASELINE_TEMPERATURE_C: f64 = 22.0;
pub const BASELINE_HUMIDITY_PCT: f64 = 65.0;
pub const BASELINE_RAINFALL_MM: f64 = 0.0;
pub const BASELINE_WIND_SPEED_KMH: f64 = 12.0;

/// Coarse sky condition attached to a reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Sunny,
    Cloudy,
    Rainy,
}

impl Condition {
    /// Parse an upstream-supplied condition string, if recognizable.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "sunny" => Some(Condition::Sunny),
            "cloudy" => Some(Condition::Cloudy),
            "rainy" => Some(Condition::Rainy),
            _ => None,
        }
    }

    /// Classify a condition from measurements when the upstream did not
    /// supply one: rain above 5mm wins, then humidity above 80%.
    pub fn classify(rainfall_mm: f64, humidity_pct: f64) -> Self {
        if rainfall_mm > 5.0 {
            Condition::Rainy
        } else if humidity_pct > 80.0 {
            Condition::Cloudy
        } else {
            Condition::Sunny
        }
    }
}

/// Where a reading came from.
///
/// `Fallback` marks synthetic baseline data produced when every observation
/// endpoint failed; consumers can then label the data as degraded instead of
/// presenting it as live.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Fallback,
}

/// A normalized weather reading for one station.
///
/// Latest-wins per `station_id`: a newer reading supersedes the previous one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReading {
    pub station_id: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub rainfall_mm: f64,
    pub wind_speed_kmh: f64,
    pub condition: Condition,
    pub alerts: Vec<String>,
    pub observed_at_ms: i64,
    pub provenance: Provenance,
}

impl WeatherReading {
    /// Synthetic baseline reading used when no endpoint produced data.
    pub fn fallback(station_id: &str, now_ms: i64) -> Self {
        Self {
            station_id: station_id.to_string(),
            temperature_c: BASELINE_TEMPERATURE_C,
            humidity_pct: BASELINE_HUMIDITY_PCT,
            rainfall_mm: BASELINE_RAINFALL_MM,
            wind_speed_kmh: BASELINE_WIND_SPEED_KMH,
            condition: Condition::Sunny,
            alerts: Vec::new(),
            observed_at_ms: now_ms,
            provenance: Provenance::Fallback,
        }
    }

    pub fn is_live(&self) -> bool {
        self.provenance == Provenance::Live
    }
}

/// Derive threshold-crossing alerts from raw measurements.
///
/// Evaluation order is fixed: drought, flood, heat, frost, wind. Several
/// alerts may coexist on one reading.
pub fn derive_alerts(temperature_c: f64, rainfall_mm: f64, wind_speed_kmh: f64) -> Vec<String> {
    let mut alerts = Vec::new();

    if rainfall_mm < 5.0 {
        alerts.push("Low rainfall warning - drought risk".to_string());
    }
    if rainfall_mm > 100.0 {
        alerts.push("High rainfall warning - flood risk".to_string());
    }
    if temperature_c > 35.0 {
        alerts.push("High temperature warning - heat stress".to_string());
    }
    if temperature_c < 5.0 {
        alerts.push("Low temperature warning - frost risk".to_string());
    }
    if wind_speed_kmh > 50.0 {
        alerts.push("High wind warning - crop damage risk".to_string());
    }

    alerts
}
