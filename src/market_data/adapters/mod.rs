// Shared trait + error for exchange order-book adapters

use crate::market_data::book::PriceLevel;

/// Raw levels as the venue returned them, before timestamping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookSides {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("exchange returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed order book: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Connection problems, 5xx and rate limiting are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            FetchError::Malformed(_) => false,
        }
    }
}

#[async_trait::async_trait]
pub trait OrderBookSource: Send + Sync {
    async fn fetch_order_book(&self, symbol: &str, limit: usize) -> Result<BookSides, FetchError>;
}

pub mod binance;
pub mod binance_types;

#[cfg(test)]
pub mod scripted;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FetchError::Network("reset".into()).is_transient());
        assert!(FetchError::Status { status: 503, body: String::new() }.is_transient());
        assert!(FetchError::Status { status: 429, body: String::new() }.is_transient());
        assert!(!FetchError::Status { status: 400, body: String::new() }.is_transient());
        assert!(!FetchError::Status { status: 418, body: String::new() }.is_transient());
        assert!(!FetchError::Malformed("x".into()).is_transient());
    }
}
