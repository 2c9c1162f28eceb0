//! Domain models for the MicroCrop crop-insurance platform

mod policy;
mod pool;
mod risk;
mod station;
mod weather;

pub use policy::*;
pub use pool::*;
pub use risk::*;
pub use station::*;
pub use weather::*;
