// Source: GET /api/v3/depth (Binance / Binance.US spot REST)
#[derive(Debug, serde::Deserialize)]
pub struct DepthResponse {
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: u64,
    pub bids: Vec<(String, String)>, // [price, qty]
    pub asks: Vec<(String, String)>,
}

// Error body, e.g. {"code":-1121,"msg":"Invalid symbol."}
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub msg: String,
}
