//! External API integrations

pub mod flow;
pub mod weatherxm;

pub use flow::FlowClient;
pub use weatherxm::WeatherXmClient;
