//! Station discovery service
//!
//! Discovery is best-effort: every sub-call that fails degrades to an empty
//! result so one bad probe never aborts the union. There are no retries;
//! a degraded result set is only visible in the logs.

use futures::future::join_all;
use std::collections::HashSet;

use shared::{GeoBounds, GeoPoint, StationDescriptor};

use crate::external::WeatherXmClient;

/// Probe terms for comprehensive Kenya-wide resolution: major towns first,
/// then generic agricultural keywords that show up in rural station names.
const KENYAN_CITIES: &[&str] = &[
    "Nairobi", "Mombasa", "Kisumu", "Nakuru", "Eldoret", "Thika", "Machakos", "Meru", "Nyeri",
    "Kericho", "Kitale", "Garissa", "Malindi", "Lamu", "Isiolo", "Kenya", "Kenyan", "East Africa",
];

const AGRICULTURAL_TERMS: &[&str] = &[
    "farm",
    "coffee",
    "tea",
    "maize",
    "agriculture",
    "crop",
    "plantation",
    "agricultural",
    "farming",
    "rural",
];

/// Station discovery service
#[derive(Clone)]
pub struct StationService {
    client: WeatherXmClient,
    region: GeoBounds,
}

impl StationService {
    pub fn new(client: WeatherXmClient, region: GeoBounds) -> Self {
        Self { client, region }
    }

    /// Free-text search, degraded to empty on failure.
    pub async fn search_by_name(&self, term: &str) -> Vec<String> {
        match self.client.search_stations(term).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(term, error = %e, "station search failed");
                Vec::new()
            }
        }
    }

    /// Bounding-box listing, degraded to empty on failure.
    pub async fn stations_in_bounds(&self, bounds: &GeoBounds) -> Vec<String> {
        match self.client.stations_in_bounds(bounds).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "bounds query failed");
                Vec::new()
            }
        }
    }

    /// Resolve every known station id for the configured region.
    ///
    /// Unions three discovery strategies: city-name probes, a bounds query
    /// over the region box, and agricultural-keyword probes. Duplicates are
    /// dropped by id, first-seen order preserved.
    pub async fn resolve_region_stations(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        for city in KENYAN_CITIES {
            merge_unique(&mut ids, &mut seen, self.search_by_name(city).await);
        }

        let region = self.region;
        merge_unique(&mut ids, &mut seen, self.stations_in_bounds(&region).await);

        for term in AGRICULTURAL_TERMS {
            merge_unique(&mut ids, &mut seen, self.search_by_name(term).await);
        }

        tracing::info!(count = ids.len(), "resolved unique stations for region");
        ids
    }

    /// Resolve stations around a center point, radius in kilometers.
    ///
    /// Details are fetched with an all-settle fan-out; a failed detail
    /// lookup synthesizes a descriptor from the id and queried coordinates.
    pub async fn stations_in_region(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Vec<StationDescriptor> {
        let bounds = GeoBounds::around(center, radius_km);
        let ids = self.stations_in_bounds(&bounds).await;

        let details = ids.iter().map(|id| async move {
            match self.client.station_details(id).await {
                Ok(station) => station,
                Err(e) => {
                    tracing::warn!(station_id = %id, error = %e, "detail lookup failed, synthesizing");
                    StationDescriptor::synthesized(id, center)
                }
            }
        });

        let stations = join_all(details).await;
        tracing::info!(count = stations.len(), "resolved stations in region");
        stations
    }
}

/// Append ids not seen before, preserving first-seen order.
fn merge_unique(ids: &mut Vec<String>, seen: &mut HashSet<String>, batch: Vec<String>) {
    for id in batch {
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_unique_deduplicates_across_batches() {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        merge_unique(
            &mut ids,
            &mut seen,
            vec!["a".to_string(), "b".to_string(), "a".to_string()],
        );
        merge_unique(&mut ids, &mut seen, vec!["b".to_string(), "c".to_string()]);

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_unique_preserves_first_seen_order() {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        merge_unique(&mut ids, &mut seen, vec!["z".to_string(), "a".to_string()]);
        merge_unique(&mut ids, &mut seen, vec!["a".to_string(), "m".to_string()]);

        assert_eq!(ids, vec!["z", "a", "m"]);
    }
}
