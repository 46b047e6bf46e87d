// In-memory source that replays a fixed script of responses

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{BookSides, FetchError, OrderBookSource};
use crate::market_data::book::PriceLevel;

pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<BookSides, FetchError>>>,
    // Served once the script runs dry; `None` means every further call fails
    fallback: Option<BookSides>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Result<BookSides, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn repeating(book: BookSides) -> Self {
        Self::new([]).with_fallback(book)
    }

    pub fn with_fallback(mut self, book: BookSides) -> Self {
        self.fallback = Some(book);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl OrderBookSource for ScriptedSource {
    async fn fetch_order_book(&self, _symbol: &str, _limit: usize) -> Result<BookSides, FetchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(next) = self.script.lock().pop_front() {
            return next;
        }
        match &self.fallback {
            Some(book) => Ok(book.clone()),
            None => Err(FetchError::Malformed("script exhausted".into())),
        }
    }
}

pub fn sample_sides() -> BookSides {
    BookSides {
        bids: vec![PriceLevel::new(99.0, 0.4), PriceLevel::new(98.0, 1.0)],
        asks: vec![PriceLevel::new(100.0, 0.5), PriceLevel::new(101.0, 1.0)],
    }
}

pub fn transient() -> Result<BookSides, FetchError> {
    Err(FetchError::Network("connection reset".into()))
}

pub fn rejected() -> Result<BookSides, FetchError> {
    Err(FetchError::Status { status: 400, body: "Invalid symbol.".into() })
}
