// Convert wire strings into typed levels and venue symbols.

use crate::market_data::adapters::FetchError;
use crate::market_data::book::PriceLevel;

/// "BTC/USDT", "btc-usdt" and "BTCUSDT" all map to "BTCUSDT".
pub fn exchange_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| !matches!(c, '/' | '-' | '_' | ' '))
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn parse_level(px: &str, sz: &str) -> Result<PriceLevel, FetchError> {
    let price = parse_decimal(px, "price")?;
    let size = parse_decimal(sz, "size")?;
    Ok(PriceLevel::new(price, size))
}

pub fn parse_side(levels: &[(String, String)]) -> Result<Vec<PriceLevel>, FetchError> {
    levels.iter().map(|(px, sz)| parse_level(px, sz)).collect()
}

fn parse_decimal(s: &str, what: &str) -> Result<f64, FetchError> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| FetchError::Malformed(format!("unparseable {what} {s:?}")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(FetchError::Malformed(format!("{what} out of range: {s:?}")));
    }
    Ok(value)
}
