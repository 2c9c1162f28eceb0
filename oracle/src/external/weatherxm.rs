//! WeatherXM Pro API client
//!
//! The upstream schema is only partially stable: station and observation
//! payloads use several field names for the same physical quantity, and
//! observations live behind more than one endpoint shape depending on
//! station firmware. Both problems are handled with ordered alias tables
//! kept as data, first match wins.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use shared::{
    derive_alerts, Condition, GeoBounds, GeoPoint, Provenance, StationDescriptor, WeatherReading,
    BASELINE_HUMIDITY_PCT, BASELINE_RAINFALL_MM, BASELINE_TEMPERATURE_C, BASELINE_WIND_SPEED_KMH,
};

use crate::error::{AppError, AppResult};

/// Observation endpoint shapes, in priority order. The first endpoint that
/// returns a non-empty body wins.
const OBSERVATION_ENDPOINTS: &[&str] = &[
    "observations/latest",
    "observations",
    "data/latest",
    "data",
];

/// Historical observation endpoint shapes, in priority order.
const HISTORICAL_ENDPOINTS: &[&str] = &[
    "observations/historical",
    "observations",
    "data/historical",
    "data",
];

/// Field aliases per physical quantity, in priority order. Dotted entries
/// are nested paths (`wind.speed`). Keeping these as data means a new
/// upstream alias is a one-line addition.
const TEMPERATURE_ALIASES: &[&str] = &["temperature", "temp", "air_temperature"];
const HUMIDITY_ALIASES: &[&str] = &["humidity", "relative_humidity", "rh"];
const RAINFALL_ALIASES: &[&str] = &["precipitation", "rain", "rainfall", "precip"];
const WIND_SPEED_ALIASES: &[&str] = &["wind_speed", "wind.speed", "ws"];
const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "datetime", "observed_at"];
const CONDITION_ALIASES: &[&str] = &["condition", "icon"];

/// WeatherXM Pro API client
#[derive(Clone)]
pub struct WeatherXmClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl WeatherXmClient {
    /// Create a new WeatherXmClient
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://pro.weatherxm.com/api/v1".to_string())
    }

    /// Create a new WeatherXmClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> AppResult<Value> {
        let response = self
            .client
            .get(url)
            .header("X-API-Key", &self.api_key)
            .header("Accept", "application/json")
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::WeatherApi(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherApi(format!("{} - {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::WeatherApi(format!("malformed response body: {}", e)))
    }

    /// Search stations by free text. Returns upstream station ids.
    pub async fn search_stations(&self, term: &str) -> AppResult<Vec<String>> {
        let url = format!("{}/stations/search", self.base_url);
        let query = [
            ("q", term.to_string()),
            ("active", "true".to_string()),
            ("limit", "50".to_string()),
        ];
        let body = self.get_json(&url, &query).await?;
        Ok(station_ids_from_list(&body))
    }

    /// List stations inside a bounding box. Returns upstream station ids.
    pub async fn stations_in_bounds(&self, bounds: &GeoBounds) -> AppResult<Vec<String>> {
        let url = format!("{}/stations", self.base_url);
        let query = [
            ("north", bounds.north.to_string()),
            ("south", bounds.south.to_string()),
            ("east", bounds.east.to_string()),
            ("west", bounds.west.to_string()),
            ("active", "true".to_string()),
            ("limit", "50".to_string()),
        ];
        let body = self.get_json(&url, &query).await?;
        Ok(station_ids_from_list(&body))
    }

    /// Fetch full station details for one id.
    pub async fn station_details(&self, id: &str) -> AppResult<StationDescriptor> {
        let url = format!("{}/stations/{}", self.base_url, id);
        let body = self.get_json(&url, &[]).await?;
        Ok(station_from_detail(id, &body))
    }

    /// Fetch the raw latest observation payload for a station, trying each
    /// endpoint shape in priority order.
    pub async fn raw_latest_observation(&self, station_id: &str) -> AppResult<Value> {
        for endpoint in OBSERVATION_ENDPOINTS {
            let url = format!("{}/stations/{}/{}", self.base_url, station_id, endpoint);
            match self.get_json(&url, &[]).await {
                Ok(body) if !is_empty_body(&body) => {
                    tracing::debug!(station_id, endpoint, "observation endpoint hit");
                    return Ok(body);
                }
                Ok(_) => {
                    tracing::debug!(station_id, endpoint, "empty body, trying next endpoint");
                }
                Err(e) => {
                    tracing::debug!(station_id, endpoint, error = %e, "endpoint failed");
                }
            }
        }
        Err(AppError::NoObservations(station_id.to_string()))
    }

    /// Fetch raw historical observations for the past `days` days.
    pub async fn raw_historical_observations(
        &self,
        station_id: &str,
        days: u32,
    ) -> AppResult<Value> {
        let to = Utc::now();
        let from = to - chrono::Duration::days(days as i64);
        let query = [
            ("from", from.to_rfc3339()),
            ("to", to.to_rfc3339()),
            ("resolution", "hourly".to_string()),
            ("limit", (days * 24).to_string()),
        ];

        for endpoint in HISTORICAL_ENDPOINTS {
            let url = format!("{}/stations/{}/{}", self.base_url, station_id, endpoint);
            match self.get_json(&url, &query).await {
                Ok(body) if !is_empty_body(&body) => return Ok(body),
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(station_id, endpoint, error = %e, "historical endpoint failed");
                }
            }
        }
        Err(AppError::NoObservations(station_id.to_string()))
    }
}

/// True when a body carries no observation (null, empty object/array).
fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Pull station ids out of a station list response.
fn station_ids_from_list(body: &Value) -> Vec<String> {
    let Some(items) = body.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|station| {
            station
                .get("id")
                .or_else(|| station.get("stationId"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect()
}

/// Build a descriptor from a station detail response.
fn station_from_detail(id: &str, body: &Value) -> StationDescriptor {
    let name = body
        .get("name")
        .or_else(|| body.get("label"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("WeatherXM Station {}", shared::truncated_id(id)));

    let latitude = lookup_f64(body, &["lat", "latitude"]).unwrap_or(0.0);
    let longitude = lookup_f64(body, &["lon", "lng", "longitude"]).unwrap_or(0.0);

    let inactive = body.get("active") == Some(&Value::Bool(false))
        || body.get("status").and_then(Value::as_str) == Some("inactive");

    StationDescriptor {
        id: id.to_string(),
        name,
        location: GeoPoint::new(latitude, longitude),
        is_active: !inactive,
    }
}

/// Resolve a dotted path (`wind.speed`) inside a JSON object.
fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

fn lookup_f64(value: &Value, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .find_map(|path| lookup_path(value, path).and_then(Value::as_f64))
}

fn lookup_str<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .find_map(|path| lookup_path(value, path).and_then(Value::as_str))
}

/// Resolve the observation timestamp to epoch millis. String values are
/// parsed as RFC 3339; numeric values are taken as epoch millis.
fn extract_timestamp_ms(observation: &Value, now_ms: i64) -> i64 {
    for path in TIMESTAMP_ALIASES {
        match lookup_path(observation, path) {
            Some(Value::String(s)) => {
                if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                    return ts.timestamp_millis();
                }
            }
            Some(value) => {
                if let Some(ms) = value.as_i64() {
                    return ms;
                }
            }
            None => {}
        }
    }
    now_ms
}

/// Normalize one observation object into a canonical reading.
pub fn extract_observation(station_id: &str, observation: &Value, now_ms: i64) -> WeatherReading {
    let temperature_c =
        lookup_f64(observation, TEMPERATURE_ALIASES).unwrap_or(BASELINE_TEMPERATURE_C);
    let humidity_pct = lookup_f64(observation, HUMIDITY_ALIASES).unwrap_or(BASELINE_HUMIDITY_PCT);
    let rainfall_mm = lookup_f64(observation, RAINFALL_ALIASES).unwrap_or(BASELINE_RAINFALL_MM);
    let wind_speed_kmh =
        lookup_f64(observation, WIND_SPEED_ALIASES).unwrap_or(BASELINE_WIND_SPEED_KMH);

    // Upstream-supplied condition wins; otherwise classify from measurements
    let condition = lookup_str(observation, CONDITION_ALIASES)
        .and_then(Condition::parse)
        .unwrap_or_else(|| Condition::classify(rainfall_mm, humidity_pct));

    WeatherReading {
        station_id: station_id.to_string(),
        temperature_c,
        humidity_pct,
        rainfall_mm,
        wind_speed_kmh,
        condition,
        alerts: derive_alerts(temperature_c, rainfall_mm, wind_speed_kmh),
        observed_at_ms: extract_timestamp_ms(observation, now_ms),
        provenance: Provenance::Live,
    }
}

/// Normalize a whole response body. Array bodies are treated as an ordered
/// sequence whose temporally-last element is "latest".
pub fn extract_reading(station_id: &str, body: &Value, now_ms: i64) -> WeatherReading {
    let observation = match body.as_array() {
        Some(items) => items.last().unwrap_or(body),
        None => body,
    };
    extract_observation(station_id, observation, now_ms)
}
