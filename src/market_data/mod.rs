// Market data module entrypoint
pub mod adapters; // venue-specific fetchers (e.g. Binance REST)
pub mod book; // immutable order book snapshot
pub mod client; // retry/backoff around an adapter
pub mod normaliser; // converts wire strings -> levels, symbols -> venue form

pub use adapters::{BookSides, FetchError, OrderBookSource};
pub use book::{OrderBookSnapshot, PriceLevel};
pub use client::{FetchFailure, FetchStats, OrderBookClient};
