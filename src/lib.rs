//! Periodic order-book sampling with slippage estimates, persisted to CSV in batches.

pub mod clock;
pub mod collector;
pub mod config;
pub mod engine;
pub mod market_data;
pub mod persist;
pub mod stats;
pub mod telemetry;
