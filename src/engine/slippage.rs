//! Slippage estimates for a hypothetical taker order against a static snapshot.
//!
//! Two estimators are exposed side by side:
//! - [`depth_weighted`]: `order_size / (bid_depth + ask_depth) * spread`. Cheap,
//!   ignores level granularity.
//! - [`simulated_fill`]: sweeps the opposite side level by level and compares the
//!   average fill price with the best price.
//!
//! A book too thin to fill the whole order yields
//! [`EstimateError::InsufficientDepth`] rather than a partial-fill figure.

use tracing::trace;

use crate::engine::types::{EstimateError, Side, SlippageRecord};
use crate::market_data::book::OrderBookSnapshot;

// Residual quantity below this fraction of the order counts as filled
const FILL_TOLERANCE: f64 = 1e-9;

/// Outcome of sweeping one side of the book.
#[derive(Debug, Clone, PartialEq)]
pub struct FillSimulation {
    pub side: Side,
    pub filled: f64,
    pub total_cost: f64,
    pub best_price: f64,
    pub average_price: f64,
    pub levels_consumed: usize,
    /// `(total_cost - order_size * best_price) / order_size`. Non-negative for
    /// buys, non-positive for sells.
    pub slippage: f64,
}

fn check_order_size(order_size: f64) -> Result<(), EstimateError> {
    if order_size.is_finite() && order_size > 0.0 {
        Ok(())
    } else {
        Err(EstimateError::InvalidOrderSize(order_size))
    }
}

/// Depth-weighted heuristic. Undefined when the spread is undefined or either
/// side has zero total size.
pub fn depth_weighted(snapshot: &OrderBookSnapshot, order_size: f64) -> Result<f64, EstimateError> {
    check_order_size(order_size)?;
    let spread = snapshot.spread().ok_or(EstimateError::UndefinedSpread)?;
    let (bid_depth, ask_depth) = (snapshot.bid_depth(), snapshot.ask_depth());
    if bid_depth <= 0.0 || ask_depth <= 0.0 {
        return Err(EstimateError::NoDepth);
    }
    Ok(order_size / (bid_depth + ask_depth) * spread)
}

/// Walk asks (buy) or bids (sell) until `order_size` is filled.
pub fn simulated_fill(
    snapshot: &OrderBookSnapshot,
    side: Side,
    order_size: f64,
) -> Result<FillSimulation, EstimateError> {
    check_order_size(order_size)?;
    let levels = snapshot.liquidity_for(side);
    let best_price = levels.first().ok_or(EstimateError::EmptyBook { side })?.price;

    let mut remaining = order_size;
    let mut total_cost = 0.0;
    let mut levels_consumed = 0;
    for level in levels {
        if remaining <= order_size * FILL_TOLERANCE {
            break;
        }
        if level.size <= 0.0 {
            continue;
        }
        let take = remaining.min(level.size);
        total_cost += take * level.price;
        remaining -= take;
        levels_consumed += 1;
        trace!(price = level.price, qty = take, remaining, "Simulated fill");
    }

    let filled = order_size - remaining.max(0.0);
    if remaining > order_size * FILL_TOLERANCE {
        return Err(EstimateError::InsufficientDepth { available: filled, requested: order_size });
    }

    Ok(FillSimulation {
        side,
        filled,
        total_cost,
        best_price,
        average_price: total_cost / filled,
        levels_consumed,
        slippage: (total_cost - order_size * best_price) / order_size,
    })
}

/// Produces one [`SlippageRecord`] per snapshot for a fixed order size.
#[derive(Debug, Clone, Copy)]
pub struct SlippageEstimator {
    order_size: f64,
}

impl SlippageEstimator {
    pub fn new(order_size: f64) -> Self {
        Self { order_size }
    }

    pub fn estimate(&self, snapshot: &OrderBookSnapshot) -> SlippageRecord {
        let fill = |side| match simulated_fill(snapshot, side, self.order_size) {
            Ok(sim) => Some(sim.slippage),
            Err(e) => {
                trace!(?side, error = %e, "Simulated fill unavailable");
                None
            }
        };

        SlippageRecord {
            best_bid: snapshot.best_bid().map(|l| l.price),
            best_ask: snapshot.best_ask().map(|l| l.price),
            spread: snapshot.spread(),
            buy_slippage: fill(Side::Buy),
            sell_slippage: fill(Side::Sell),
            depth_slippage: depth_weighted(snapshot, self.order_size).ok(),
            timestamp: snapshot.fetched_at(),
        }
    }
}
