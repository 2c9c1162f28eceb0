//! Business logic services for the MicroCrop weather oracle

pub mod insurance;
pub mod observations;
pub mod stations;
pub mod sync;

pub use insurance::{BulkUpdateOutcome, InsuranceService};
pub use observations::ObservationService;
pub use stations::StationService;
pub use sync::{SyncHandle, WeatherSyncService};
