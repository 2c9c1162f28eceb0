//! Validation utilities for weather readings and policy inputs
//!
//! Readings must pass range checks before any on-chain write; out-of-range
//! values are rejected outright, never clamped or coerced.

use rust_decimal::Decimal;

use crate::models::WeatherReading;

/// Accepted physical ranges for a reading bound for the oracle contract.
pub const TEMPERATURE_RANGE_C: (f64, f64) = (-50.0, 60.0);
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);
pub const RAINFALL_RANGE_MM: (f64, f64) = (0.0, 1000.0);
pub const WIND_SPEED_RANGE_KMH: (f64, f64) = (0.0, 200.0);

/// Validate a reading before it is accepted for an on-chain write.
pub fn validate_reading(reading: &WeatherReading) -> Result<(), &'static str> {
    if reading.station_id.is_empty() {
        return Err("Station id must not be empty");
    }
    if reading.temperature_c < TEMPERATURE_RANGE_C.0 || reading.temperature_c > TEMPERATURE_RANGE_C.1
    {
        return Err("Temperature out of range (-50..60 C)");
    }
    if reading.humidity_pct < HUMIDITY_RANGE_PCT.0 || reading.humidity_pct > HUMIDITY_RANGE_PCT.1 {
        return Err("Humidity out of range (0..100%)");
    }
    if reading.rainfall_mm < RAINFALL_RANGE_MM.0 || reading.rainfall_mm > RAINFALL_RANGE_MM.1 {
        return Err("Rainfall out of range (0..1000mm)");
    }
    if reading.wind_speed_kmh < WIND_SPEED_RANGE_KMH.0
        || reading.wind_speed_kmh > WIND_SPEED_RANGE_KMH.1
    {
        return Err("Wind speed out of range (0..200km/h)");
    }
    Ok(())
}

/// Validate coverage and premium amounts for policy registration
pub fn validate_policy_amounts(coverage: Decimal, premium: Decimal) -> Result<(), &'static str> {
    if coverage <= Decimal::ZERO {
        return Err("Coverage amount must be positive");
    }
    if premium <= Decimal::ZERO {
        return Err("Premium amount must be positive");
    }
    if premium >= coverage {
        return Err("Premium must be less than coverage");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, Provenance};

    fn reading() -> WeatherReading {
        WeatherReading {
            station_id: "station-1".to_string(),
            temperature_c: 22.0,
            humidity_pct: 65.0,
            rainfall_mm: 0.0,
            wind_speed_kmh: 12.0,
            condition: Condition::Sunny,
            alerts: Vec::new(),
            observed_at_ms: 0,
            provenance: Provenance::Live,
        }
    }

    #[test]
    fn test_baseline_reading_is_valid() {
        assert!(validate_reading(&reading()).is_ok());
    }

    #[test]
    fn test_humidity_boundary() {
        let mut r = reading();
        r.humidity_pct = 100.0;
        assert!(validate_reading(&r).is_ok());

        r.humidity_pct = 101.0;
        assert!(validate_reading(&r).is_err());
    }

    #[test]
    fn test_temperature_boundaries() {
        let mut r = reading();
        r.temperature_c = -50.0;
        assert!(validate_reading(&r).is_ok());
        r.temperature_c = 60.0;
        assert!(validate_reading(&r).is_ok());
        r.temperature_c = 60.1;
        assert!(validate_reading(&r).is_err());
        r.temperature_c = -50.1;
        assert!(validate_reading(&r).is_err());
    }

    #[test]
    fn test_rainfall_and_wind_ranges() {
        let mut r = reading();
        r.rainfall_mm = 1000.0;
        assert!(validate_reading(&r).is_ok());
        r.rainfall_mm = 1000.5;
        assert!(validate_reading(&r).is_err());

        let mut r = reading();
        r.wind_speed_kmh = 200.0;
        assert!(validate_reading(&r).is_ok());
        r.wind_speed_kmh = -1.0;
        assert!(validate_reading(&r).is_err());
    }

    #[test]
    fn test_empty_station_id_rejected() {
        let mut r = reading();
        r.station_id = String::new();
        assert!(validate_reading(&r).is_err());
    }

    #[test]
    fn test_policy_amounts() {
        assert!(validate_policy_amounts(Decimal::from(5000), Decimal::from(250)).is_ok());
        assert!(validate_policy_amounts(Decimal::ZERO, Decimal::from(250)).is_err());
        assert!(validate_policy_amounts(Decimal::from(100), Decimal::from(100)).is_err());
        assert!(validate_policy_amounts(Decimal::from(100), Decimal::from(-5)).is_err());
    }
}
