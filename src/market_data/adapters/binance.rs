// Binance spot REST adapter (order book depth snapshots)

use std::time::Duration;

use tracing::{debug, instrument};

use super::binance_types::{ApiError, DepthResponse};
use super::{BookSides, FetchError, OrderBookSource};
use crate::market_data::normaliser::{exchange_symbol, parse_side};

pub const BINANCE_US_REST_URL: &str = "https://api.binance.us";

pub struct BinanceRestAdapter {
    client: reqwest::Client,
    base_url: String, // e.g. "https://api.binance.us"
}

impl BinanceRestAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn depth_url(&self) -> String {
        format!("{}/api/v3/depth", self.base_url)
    }
}

#[async_trait::async_trait]
impl OrderBookSource for BinanceRestAdapter {
    #[instrument(skip(self), level = "debug")]
    async fn fetch_order_book(&self, symbol: &str, limit: usize) -> Result<BookSides, FetchError> {
        let venue_symbol = exchange_symbol(symbol);
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.depth_url())
            .query(&[("symbol", venue_symbol.as_str()), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            // Prefer the venue's own message when the body is a Binance error object
            let detail = match serde_json::from_slice::<ApiError>(&body) {
                Ok(api) => format!("{} (code {})", api.msg, api.code),
                Err(_) => String::from_utf8_lossy(&body).into_owned(),
            };
            return Err(FetchError::Status { status: status.as_u16(), body: detail });
        }

        let depth: DepthResponse =
            serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;
        let sides = BookSides {
            bids: parse_side(&depth.bids)?,
            asks: parse_side(&depth.asks)?,
        };
        debug!(
            symbol = %venue_symbol,
            update_id = depth.last_update_id,
            bids = sides.bids.len(),
            asks = sides.asks.len(),
            "Fetched depth snapshot"
        );
        Ok(sides)
    }
}
