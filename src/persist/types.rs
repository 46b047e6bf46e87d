#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV failure: {0}")]
    Csv(#[from] csv::Error),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Column order of the output file. Matches the field order of `SlippageRecord`.
pub const CSV_COLUMNS: [&str; 7] = [
    "best_bid",
    "best_ask",
    "spread",
    "buy_slippage",
    "sell_slippage",
    "depth_slippage",
    "timestamp",
];
