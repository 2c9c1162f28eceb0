//! Weather risk scoring for insurance decisions
//!
//! Scores are a pure function of a reading plus fixed thresholds; nothing
//! here holds state, so an assessment can always be recomputed on demand.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::weather::WeatherReading;

/// Risk tier derived from a numeric score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// No reading was available for the station.
    Unknown,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Risk assessment for one station's latest reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub score: u32,
    pub level: RiskLevel,
    pub factors: Vec<String>,
}

impl RiskAssessment {
    /// Assessment when no reading exists for the station.
    pub fn unknown() -> Self {
        Self {
            score: 0,
            level: RiskLevel::Unknown,
            factors: Vec::new(),
        }
    }

    /// Score a reading.
    ///
    /// Additive across independent factor categories; within each category
    /// only the first (most severe) matching clause fires.
    pub fn from_reading(reading: &WeatherReading) -> Self {
        let mut score = 0u32;

        // Temperature extremes
        if reading.temperature_c < 5.0 || reading.temperature_c > 35.0 {
            score += 30;
        } else if reading.temperature_c < 10.0 || reading.temperature_c > 30.0 {
            score += 15;
        }

        // Rainfall: drought and flood are disjoint, one clause at most fires
        if reading.rainfall_mm < 5.0 {
            score += 25;
        } else if reading.rainfall_mm > 100.0 {
            score += 35;
        }

        // Wind
        if reading.wind_speed_kmh > 50.0 {
            score += 20;
        } else if reading.wind_speed_kmh > 30.0 {
            score += 10;
        }

        // Humidity extremes
        if reading.humidity_pct < 20.0 || reading.humidity_pct > 90.0 {
            score += 10;
        }

        let level = if score > 60 {
            RiskLevel::High
        } else if score > 30 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        Self {
            score,
            level,
            factors: risk_factors(reading),
        }
    }
}

/// Human-readable contributing factors, same thresholds as the score.
pub fn risk_factors(reading: &WeatherReading) -> Vec<String> {
    let mut factors = Vec::new();

    if reading.temperature_c > 35.0 {
        factors.push("High temperature - heat stress risk".to_string());
    }
    if reading.temperature_c < 5.0 {
        factors.push("Low temperature - frost risk".to_string());
    }
    if reading.rainfall_mm < 5.0 {
        factors.push("Low rainfall - drought risk".to_string());
    }
    if reading.rainfall_mm > 100.0 {
        factors.push("High rainfall - flood risk".to_string());
    }
    if reading.wind_speed_kmh > 50.0 {
        factors.push("High wind speed - crop damage risk".to_string());
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weather::{Condition, Provenance};

    fn reading(temperature_c: f64, rainfall_mm: f64, humidity_pct: f64, wind: f64) -> WeatherReading {
        WeatherReading {
            station_id: "test-station".to_string(),
            temperature_c,
            humidity_pct,
            rainfall_mm,
            wind_speed_kmh: wind,
            condition: Condition::Sunny,
            alerts: Vec::new(),
            observed_at_ms: 0,
            provenance: Provenance::Live,
        }
    }

    #[test]
    fn test_heat_and_drought_is_medium() {
        // 30 (temperature) + 25 (drought) = 55
        let assessment = RiskAssessment::from_reading(&reading(40.0, 2.0, 50.0, 10.0));
        assert_eq!(assessment.score, 55);
        assert_eq!(assessment.level, RiskLevel::Medium);
    }

    #[test]
    fn test_flood_wind_humidity_is_high() {
        // 0 + 35 (flood) + 20 (wind) + 10 (humidity) = 65
        let assessment = RiskAssessment::from_reading(&reading(22.0, 150.0, 95.0, 60.0));
        assert_eq!(assessment.score, 65);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_mild_weather_is_low() {
        let assessment = RiskAssessment::from_reading(&reading(22.0, 20.0, 60.0, 10.0));
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn test_severe_clause_shadows_moderate_clause() {
        // 40C matches both >35 and >30; only the severe clause fires
        let hot = RiskAssessment::from_reading(&reading(40.0, 20.0, 60.0, 10.0));
        assert_eq!(hot.score, 30);

        let warm = RiskAssessment::from_reading(&reading(32.0, 20.0, 60.0, 10.0));
        assert_eq!(warm.score, 15);
    }

    #[test]
    fn test_factors_match_score_thresholds() {
        let assessment = RiskAssessment::from_reading(&reading(40.0, 2.0, 50.0, 10.0));
        assert_eq!(
            assessment.factors,
            vec![
                "High temperature - heat stress risk",
                "Low rainfall - drought risk",
            ]
        );
    }

    #[test]
    fn test_unknown_assessment_is_empty() {
        let assessment = RiskAssessment::unknown();
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Unknown);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let r = reading(3.0, 120.0, 15.0, 55.0);
        assert_eq!(
            RiskAssessment::from_reading(&r),
            RiskAssessment::from_reading(&r)
        );
    }

    #[test]
    fn test_risk_level_display_is_lowercase() {
        assert_eq!(RiskLevel::High.to_string(), "high");
        assert_eq!(RiskLevel::Unknown.to_string(), "unknown");
    }
}
