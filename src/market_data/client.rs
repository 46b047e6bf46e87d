//! Retrying front for an [`OrderBookSource`].
//!
//! Transient failures back off for `2^attempt` seconds (1s, 2s, 4s, ...) between
//! attempts. Everything ends up as a [`FetchFailure`] value; the caller decides
//! whether to skip the sample.

use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::market_data::adapters::{FetchError, OrderBookSource};
use crate::market_data::book::OrderBookSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    #[error("gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: FetchError },
    #[error("non-retryable fetch error: {0}")]
    Rejected(FetchError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

/// Wait before retrying after the given 0-based failed attempt.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(16))
}

pub struct OrderBookClient<S, C = SystemClock> {
    source: S,
    clock: C,
    stats: FetchStats,
}

impl<S: OrderBookSource> OrderBookClient<S, SystemClock> {
    pub fn new(source: S) -> Self {
        Self::with_clock(source, SystemClock)
    }
}

impl<S: OrderBookSource, C: Clock> OrderBookClient<S, C> {
    pub fn with_clock(source: S, clock: C) -> Self {
        Self { source, clock, stats: FetchStats::default() }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    /// Fetch a snapshot, making at most `max_retries` attempts (never fewer than one).
    #[instrument(skip(self))]
    pub async fn fetch(
        &mut self,
        symbol: &str,
        limit: usize,
        max_retries: u32,
    ) -> Result<OrderBookSnapshot, FetchFailure> {
        let max_attempts = max_retries.max(1);
        let mut attempt = 0;
        loop {
            self.stats.attempts += 1;
            metrics::counter!("slippage_fetch_attempts_total").increment(1);

            let err = match self.source.fetch_order_book(symbol, limit).await {
                Ok(sides) => {
                    self.stats.successes += 1;
                    return Ok(OrderBookSnapshot::new(sides.bids, sides.asks, self.clock.now()));
                }
                Err(err) => err,
            };

            if !err.is_transient() {
                self.stats.failures += 1;
                warn!(error = %err, "Order book fetch rejected");
                return Err(FetchFailure::Rejected(err));
            }

            if attempt + 1 >= max_attempts {
                self.stats.failures += 1;
                warn!(attempts = max_attempts, error = %err, "Order book fetch failed after retries");
                return Err(FetchFailure::Exhausted { attempts: max_attempts, last_error: err });
            }

            let delay = backoff_delay(attempt);
            debug!(attempt, delay_secs = delay.as_secs(), error = %err, "Transient fetch error, backing off");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::market_data::adapters::scripted::{rejected, sample_sides, transient, ScriptedSource};
    use crate::market_data::adapters::BookSides;
    use tokio::time::Instant;

    fn client(script: Vec<Result<BookSides, FetchError>>) -> OrderBookClient<ScriptedSource, FixedClock> {
        OrderBookClient::with_clock(ScriptedSource::new(script), FixedClock(1_000.0))
    }

    #[test]
    fn test_backoff_doubles_from_one_second() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success() {
        let mut client = client(vec![Ok(sample_sides())]);
        let snap = client.fetch("BTC/USDT", 50, 3).await.unwrap();
        assert_eq!(snap.fetched_at(), 1_000.0);
        assert_eq!(snap.best_bid().unwrap().price, 99.0);
        assert_eq!(client.stats(), FetchStats { attempts: 1, successes: 1, failures: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_with_backoff() {
        let mut client = client(vec![transient(), transient(), Ok(sample_sides())]);
        let start = Instant::now();
        let snap = client.fetch("BTC/USDT", 50, 3).await;
        assert!(snap.is_ok());
        // 1s after the first failure, 2s after the second
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(3) && waited < Duration::from_millis(3_100));
        assert_eq!(client.stats().attempts, 3);
        assert_eq!(client.source().calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries() {
        let mut client = client(vec![transient(), transient(), transient(), Ok(sample_sides())]);
        let start = Instant::now();
        let err = client.fetch("BTC/USDT", 50, 3).await.unwrap_err();
        assert!(matches!(err, FetchFailure::Exhausted { attempts: 3, .. }));
        // No sleep after the final attempt
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(3) && waited < Duration::from_millis(3_100));
        assert_eq!(client.stats(), FetchStats { attempts: 3, successes: 0, failures: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_is_not_retried() {
        let mut client = client(vec![rejected(), Ok(sample_sides())]);
        let start = Instant::now();
        let err = client.fetch("BTC/USDT", 50, 3).await.unwrap_err();
        assert!(matches!(err, FetchFailure::Rejected(FetchError::Status { status: 400, .. })));
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(client.source().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_still_attempts_once() {
        let mut client = client(vec![transient()]);
        let err = client.fetch("BTC/USDT", 50, 0).await.unwrap_err();
        assert!(matches!(err, FetchFailure::Exhausted { attempts: 1, .. }));
        assert_eq!(client.stats().attempts, 1);
    }
}
