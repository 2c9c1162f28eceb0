//! Policy recommendation tests
//!
//! Tests for the premium recommendation rules: tier base tables, crop
//! multipliers, and the not-recommended path when no reading exists.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{crop_multiplier, PolicyRecommendation, RiskAssessment, RiskLevel};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn assessment(level: RiskLevel) -> RiskAssessment {
    RiskAssessment {
        score: 0,
        level,
        factors: Vec::new(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_high_risk_rice() {
    let rec = PolicyRecommendation::from_assessment(&assessment(RiskLevel::High), "rice");
    assert_eq!(rec.suggested_coverage, Decimal::from(5000));
    assert_eq!(rec.premium_multiplier, dec("1.95"));
}

#[test]
fn test_low_risk_unknown_crop() {
    let rec = PolicyRecommendation::from_assessment(&assessment(RiskLevel::Low), "unknown-crop");
    assert_eq!(rec.suggested_coverage, Decimal::from(1000));
    assert_eq!(rec.premium_multiplier, dec("1.0"));
}

#[test]
fn test_reason_template() {
    let rec = PolicyRecommendation::from_assessment(&assessment(RiskLevel::Medium), "wheat");
    assert_eq!(rec.reason, "medium risk level detected");
}

#[test]
fn test_no_reading_not_recommended() {
    let rec = PolicyRecommendation::from_assessment(&RiskAssessment::unknown(), "corn");
    assert!(!rec.recommended);
    assert_eq!(rec.reason, "No weather data available");
    assert_eq!(rec.suggested_coverage, Decimal::ZERO);
}

// ============================================================================
// Property Tests
// ============================================================================

fn known_level_strategy() -> impl Strategy<Value = RiskLevel> {
    prop_oneof![
        Just(RiskLevel::Low),
        Just(RiskLevel::Medium),
        Just(RiskLevel::High),
    ]
}

fn crop_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("corn".to_string()),
        Just("wheat".to_string()),
        Just("soybeans".to_string()),
        Just("rice".to_string()),
        Just("cotton".to_string()),
        "[a-z]{3,12}",
    ]
}

proptest! {
    /// Final multiplier is always the tier multiplier times the crop
    /// multiplier, for known and unknown crops alike.
    #[test]
    fn prop_multiplier_composition(level in known_level_strategy(), crop in crop_strategy()) {
        let rec = PolicyRecommendation::from_assessment(&assessment(level), &crop);
        let tier = match level {
            RiskLevel::High => dec("1.5"),
            RiskLevel::Medium => dec("1.2"),
            RiskLevel::Low => dec("1.0"),
            RiskLevel::Unknown => unreachable!(),
        };
        prop_assert_eq!(rec.premium_multiplier, tier * crop_multiplier(&crop));
    }

    /// Any known risk level produces a positive recommendation with a
    /// tier-appropriate coverage amount.
    #[test]
    fn prop_known_levels_are_recommended(level in known_level_strategy(), crop in crop_strategy()) {
        let rec = PolicyRecommendation::from_assessment(&assessment(level), &crop);
        prop_assert!(rec.recommended);
        let expected = match level {
            RiskLevel::High => 5000,
            RiskLevel::Medium => 3000,
            RiskLevel::Low => 1000,
            RiskLevel::Unknown => unreachable!(),
        };
        prop_assert_eq!(rec.suggested_coverage, Decimal::from(expected));
    }

    /// Crop lookup is case-insensitive.
    #[test]
    fn prop_crop_lookup_case_insensitive(crop in crop_strategy()) {
        prop_assert_eq!(crop_multiplier(&crop), crop_multiplier(&crop.to_uppercase()));
    }
}
