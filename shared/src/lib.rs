//! Shared types and models for the MicroCrop crop-insurance platform
//!
//! This crate contains the canonical weather, risk, and policy types used by
//! the oracle service and other components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
