//! Insurance policy models and premium recommendation rules

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::risk::{RiskAssessment, RiskLevel};

/// Crop-specific premium multipliers. Lookup is case-insensitive; unknown
/// crops fall back to 1.0. Kept as data so new crops are additive.
pub const CROP_MULTIPLIERS: &[(&str, Decimal)] = &[
    ("corn", Decimal::from_parts(11, 0, 0, false, 1)),
    ("wheat", Decimal::from_parts(10, 0, 0, false, 1)),
    ("soybeans", Decimal::from_parts(12, 0, 0, false, 1)),
    ("rice", Decimal::from_parts(13, 0, 0, false, 1)),
    ("cotton", Decimal::from_parts(14, 0, 0, false, 1)),
];

/// Premium multiplier for a crop type (1.0 when the crop is unknown)
pub fn crop_multiplier(crop_type: &str) -> Decimal {
    let crop = crop_type.to_lowercase();
    CROP_MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == crop)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(Decimal::ONE)
}

/// A registered insurance policy as read back from the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInfo {
    pub policy_id: String,
    pub farmer_address: String,
    pub location_id: String,
    pub crop_type: String,
    pub coverage_amount: Decimal,
    pub is_active: bool,
}

/// Suggested coverage and premium terms for a prospective policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyRecommendation {
    pub recommended: bool,
    pub reason: String,
    pub suggested_coverage: Decimal,
    pub premium_multiplier: Decimal,
    pub risk_factors: Vec<String>,
}

impl PolicyRecommendation {
    /// Derive a recommendation from a risk assessment and a crop type.
    ///
    /// Pure function of its inputs: base coverage and multiplier come from
    /// the risk tier, then the crop multiplier is applied on top.
    pub fn from_assessment(assessment: &RiskAssessment, crop_type: &str) -> Self {
        let (suggested_coverage, tier_multiplier) = match assessment.level {
            RiskLevel::High => (Decimal::from(5000), Decimal::new(15, 1)),
            RiskLevel::Medium => (Decimal::from(3000), Decimal::new(12, 1)),
            RiskLevel::Low => (Decimal::from(1000), Decimal::ONE),
            RiskLevel::Unknown => {
                return Self {
                    recommended: false,
                    reason: "No weather data available".to_string(),
                    suggested_coverage: Decimal::ZERO,
                    premium_multiplier: Decimal::ONE,
                    risk_factors: Vec::new(),
                };
            }
        };

        Self {
            recommended: true,
            reason: format!("{} risk level detected", assessment.level),
            suggested_coverage,
            premium_multiplier: tier_multiplier * crop_multiplier(crop_type),
            risk_factors: assessment.factors.clone(),
        }
    }
}
