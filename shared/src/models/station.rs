//! Weather station models

use serde::{Deserialize, Serialize};

use crate::types::GeoPoint;

/// A weather station known to the upstream network.
///
/// Identity is the upstream-assigned `id`; all other fields are descriptive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationDescriptor {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub is_active: bool,
}

impl StationDescriptor {
    /// Synthesize a descriptor for a station whose detail lookup failed.
    ///
    /// Only the id and the originally queried coordinates are known; the
    /// station is assumed active so it stays in the observation rotation.
    pub fn synthesized(id: &str, queried_at: GeoPoint) -> Self {
        Self {
            id: id.to_string(),
            name: format!("WeatherXM Station {}", truncated_id(id)),
            location: queried_at,
            is_active: true,
        }
    }
}

/// Short display form of a station id (first 8 characters)
///
/// Ids are upstream-assigned and opaque, so truncation counts characters,
/// not bytes.
pub fn truncated_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((index, _)) => &id[..index],
        None => id,
    }
}
