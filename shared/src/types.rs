//! Common geographic types used across the platform

use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Geographic bounding box
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Build a bounding box around a center point from a radius in kilometers.
    ///
    /// Uses the `radius_km / 111` degree approximation, applied symmetrically
    /// in all four directions. This treats a degree of longitude as equal to
    /// a degree of latitude, which only holds near the equator. The deployment
    /// region (Kenya) straddles the equator, so the approximation is kept
    /// as-is rather than corrected for longitude compression.
    pub fn around(center: GeoPoint, radius_km: f64) -> Self {
        let radius_deg = radius_km / 111.0;
        Self {
            north: center.latitude + radius_deg,
            south: center.latitude - radius_deg,
            east: center.longitude + radius_deg,
            west: center.longitude - radius_deg,
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.latitude <= self.north
            && point.latitude >= self.south
            && point.longitude <= self.east
            && point.longitude >= self.west
    }
}
