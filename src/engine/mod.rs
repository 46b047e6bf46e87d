pub mod slippage;
pub mod types;

pub use slippage::{depth_weighted, simulated_fill, FillSimulation, SlippageEstimator};
pub use types::{EstimateError, Side, SlippageRecord};
