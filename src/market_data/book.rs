use crate::engine::types::Side;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLevel {
    pub price: f64,
    pub size: f64,
}

impl PriceLevel {
    pub fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }
}

// Point-in-time view of the book as returned by the exchange
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBookSnapshot {
    bids: Vec<PriceLevel>, // highest price first
    asks: Vec<PriceLevel>, // lowest price first
    fetched_at: f64,
}

impl OrderBookSnapshot {
    pub fn new(mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>, fetched_at: f64) -> Self {
        bids.sort_by(|a, b| b.price.total_cmp(&a.price));
        asks.sort_by(|a, b| a.price.total_cmp(&b.price));
        Self { bids, asks, fetched_at }
    }

    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Unix seconds at which the snapshot was taken.
    pub fn fetched_at(&self) -> f64 {
        self.fetched_at
    }

    /// Levels a taker order on `side` would consume: asks for a buy, bids for a sell.
    pub fn liquidity_for(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }

    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks.first().copied()
    }

    pub fn bbo(&self) -> (Option<PriceLevel>, Option<PriceLevel>) {
        (self.best_bid(), self.best_ask())
    }

    /// Best ask minus best bid; `None` when either side is empty.
    pub fn spread(&self) -> Option<f64> {
        match self.bbo() {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    pub fn bid_depth(&self) -> f64 {
        self.bids.iter().map(|l| l.size).sum()
    }

    pub fn ask_depth(&self) -> f64 {
        self.asks.iter().map(|l| l.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lv(price: f64, size: f64) -> PriceLevel {
        PriceLevel::new(price, size)
    }

    #[test]
    fn test_levels_are_sorted_on_construction() {
        let snap = OrderBookSnapshot::new(
            vec![lv(99.0, 1.0), lv(100.0, 2.0), lv(98.5, 1.0)],
            vec![lv(102.0, 1.0), lv(101.0, 3.0)],
            0.0,
        );
        let bid_prices: Vec<f64> = snap.bids().iter().map(|l| l.price).collect();
        let ask_prices: Vec<f64> = snap.asks().iter().map(|l| l.price).collect();
        assert_eq!(bid_prices, vec![100.0, 99.0, 98.5]);
        assert_eq!(ask_prices, vec![101.0, 102.0]);
    }

    #[test]
    fn test_bbo_and_spread() {
        let snap = OrderBookSnapshot::new(vec![lv(100.0, 2.0)], vec![lv(100.5, 1.0)], 10.0);
        assert_eq!(snap.best_bid(), Some(lv(100.0, 2.0)));
        assert_eq!(snap.best_ask(), Some(lv(100.5, 1.0)));
        assert_eq!(snap.spread(), Some(0.5));
        assert_eq!(snap.fetched_at(), 10.0);
    }

    #[test]
    fn test_spread_missing_side() {
        let only_bids = OrderBookSnapshot::new(vec![lv(100.0, 1.0)], vec![], 0.0);
        assert_eq!(only_bids.best_ask(), None);
        assert_eq!(only_bids.spread(), None);

        let empty = OrderBookSnapshot::new(vec![], vec![], 0.0);
        assert_eq!(empty.bbo(), (None, None));
        assert_eq!(empty.bid_depth(), 0.0);
    }

    #[test]
    fn test_liquidity_for_side() {
        let snap = OrderBookSnapshot::new(vec![lv(99.0, 1.0)], vec![lv(101.0, 2.0)], 0.0);
        assert_eq!(snap.liquidity_for(Side::Buy), &[lv(101.0, 2.0)]);
        assert_eq!(snap.liquidity_for(Side::Sell), &[lv(99.0, 1.0)]);
        assert_eq!(snap.ask_depth(), 2.0);
    }

    proptest! {
        #[test]
        fn prop_spread_matches_bbo_and_is_non_negative(
            bids in prop::collection::vec((1.0f64..100.0, 0.01f64..10.0), 1..20),
            gap in 0.0f64..5.0,
            asks in prop::collection::vec((0.0f64..100.0, 0.01f64..10.0), 1..20),
        ) {
            let bids: Vec<PriceLevel> = bids.into_iter().map(|(p, s)| lv(p, s)).collect();
            let top_bid = bids.iter().map(|l| l.price).fold(f64::MIN, f64::max);
            // Lift every ask above the top bid so the book is never crossed
            let asks: Vec<PriceLevel> = asks.into_iter().map(|(p, s)| lv(top_bid + gap + p, s)).collect();

            let snap = OrderBookSnapshot::new(bids, asks, 0.0);
            let spread = snap.spread().unwrap();
            prop_assert_eq!(spread, snap.best_ask().unwrap().price - snap.best_bid().unwrap().price);
            prop_assert!(spread >= 0.0);
        }
    }
}
