use serde::{Deserialize, Serialize};

/// Direction of the hypothetical taker order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

// Why an estimate could not be produced
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error("order size must be positive and finite, got {0}")]
    InvalidOrderSize(f64),
    #[error("no liquidity for a {side:?} order")]
    EmptyBook { side: Side },
    #[error("book depth {available} cannot fill an order of {requested}")]
    InsufficientDepth { available: f64, requested: f64 },
    #[error("spread is undefined")]
    UndefinedSpread,
    #[error("total book depth is zero on at least one side")]
    NoDepth,
}

/// One row of collected output. Built once per successful snapshot.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlippageRecord {
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub spread: Option<f64>,
    pub buy_slippage: Option<f64>,
    pub sell_slippage: Option<f64>,
    pub depth_slippage: Option<f64>,
    pub timestamp: f64,
}
