//! Batched sampling loop.
//!
//! Each tick fetches one snapshot, turns it into a [`SlippageRecord`] and
//! buffers it. A full batch is handed to the sink straight away; whatever is
//! buffered when the loop stops (target reached, Ctrl-C) is flushed as a final,
//! shorter batch. Shutdown is only observed between ticks, never mid-request.

pub mod types;
pub use types::*;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{error, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::CollectorConfig;
use crate::engine::slippage::SlippageEstimator;
use crate::engine::types::SlippageRecord;
use crate::market_data::adapters::OrderBookSource;
use crate::market_data::client::OrderBookClient;
use crate::persist::RecordSink;

/// Progress is logged on every `every`-th sample; 0 turns it off.
fn progress_due(total_processed: u64, every: u64) -> bool {
    every > 0 && total_processed % every == 0
}

pub struct BatchCollector<S, W, C = SystemClock> {
    client: OrderBookClient<S, C>,
    estimator: SlippageEstimator,
    sink: W,
    config: CollectorConfig,
    state: CollectorState,
    batch: Vec<SlippageRecord>,
    total_processed: u64,
    batch_number: u64,
}

impl<S, W, C> BatchCollector<S, W, C>
where
    S: OrderBookSource,
    W: RecordSink,
    C: Clock,
{
    pub fn new(client: OrderBookClient<S, C>, sink: W, config: CollectorConfig) -> Self {
        Self {
            client,
            estimator: SlippageEstimator::new(config.order_size),
            sink,
            batch: Vec::with_capacity(config.batch_size),
            config,
            state: CollectorState::Running,
            total_processed: 0,
            batch_number: 0,
        }
    }

    pub fn state(&self) -> CollectorState {
        self.state
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    /// Number of batches flushed so far.
    pub fn batch_number(&self) -> u64 {
        self.batch_number
    }

    /// Records buffered but not yet flushed.
    pub fn pending(&self) -> &[SlippageRecord] {
        &self.batch
    }

    pub fn client(&self) -> &OrderBookClient<S, C> {
        &self.client
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    fn target_reached(&self) -> bool {
        self.config.total_points.map_or(false, |target| self.total_processed >= target)
    }

    /// One sample: fetch, estimate, buffer, flush when the batch is full.
    /// A failed fetch is skipped without touching any counter.
    #[instrument(skip(self), fields(total_processed = self.total_processed))]
    pub async fn tick(&mut self) -> Result<TickOutcome, CollectorError> {
        if self.state == CollectorState::Stopped {
            return Err(CollectorError::Stopped);
        }

        let fetched = self
            .client
            .fetch(&self.config.symbol, self.config.depth_limit, self.config.max_retries)
            .await;
        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(failure) => {
                metrics::counter!("slippage_skipped_total").increment(1);
                warn!(error = %failure, "Skipping sample");
                return Ok(TickOutcome::Skipped);
            }
        };

        self.batch.push(self.estimator.estimate(&snapshot));
        self.total_processed += 1;
        metrics::counter!("slippage_samples_total").increment(1);

        if progress_due(self.total_processed, self.config.progress_every) {
            info!(total_processed = self.total_processed, "Processed samples");
        }

        if self.batch.len() >= self.config.batch_size {
            self.flush()?;
            return Ok(TickOutcome::Recorded { flushed: true });
        }
        Ok(TickOutcome::Recorded { flushed: false })
    }

    fn flush(&mut self) -> Result<(), CollectorError> {
        if self.batch.is_empty() {
            return Ok(());
        }

        self.state = CollectorState::Flushing;
        let is_first_batch = self.batch_number == 0;
        match self.sink.append(&self.batch, is_first_batch) {
            Ok(()) => {
                info!(batch_number = self.batch_number, records = self.batch.len(), "Saved batch");
                metrics::counter!("slippage_batches_flushed_total").increment(1);
                self.batch_number += 1;
                self.batch.clear();
                self.state = CollectorState::Running;
                Ok(())
            }
            Err(source) => {
                // Flushes are never retried; stop and surface the failure
                self.state = CollectorState::Stopped;
                error!(
                    batch_number = self.batch_number,
                    records = self.batch.len(),
                    total_processed = self.total_processed,
                    error = %source,
                    "Failed to save batch, stopping collection"
                );
                Err(CollectorError::Flush {
                    batch_number: self.batch_number,
                    records: self.batch.len(),
                    total_processed: self.total_processed,
                    source,
                })
            }
        }
    }

    /// Drive ticks until `total_points` is reached or `shutdown` fires (a
    /// closed channel counts as a shutdown). The inter-tick delay applies
    /// after skipped ticks as well.
    pub async fn run(
        &mut self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<CollectionSummary, CollectorError> {
        if self.state == CollectorState::Stopped {
            return Err(CollectorError::Stopped);
        }

        info!(
            symbol = %self.config.symbol,
            order_size = self.config.order_size,
            batch_size = self.config.batch_size,
            delay_secs = self.config.delay_seconds,
            total_points = ?self.config.total_points,
            "Starting collection"
        );

        let stop_reason = loop {
            if self.target_reached() {
                break StopReason::TargetReached;
            }
            if !matches!(shutdown.try_recv(), Err(TryRecvError::Empty)) {
                break StopReason::Interrupted;
            }

            self.tick().await?;

            if self.target_reached() {
                break StopReason::TargetReached;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.config.delay()) => {}
                _ = shutdown.recv() => break StopReason::Interrupted,
            }
        };

        self.finish(stop_reason)
    }

    fn finish(&mut self, stop_reason: StopReason) -> Result<CollectionSummary, CollectorError> {
        if stop_reason == StopReason::Interrupted {
            info!(pending = self.batch.len(), "Data collection interrupted");
        }
        self.flush()?;
        self.state = CollectorState::Stopped;

        let summary = CollectionSummary {
            total_processed: self.total_processed,
            batches_flushed: self.batch_number,
            stop_reason,
            fetch_stats: self.client.stats(),
        };
        info!(
            total_processed = summary.total_processed,
            batches = summary.batches_flushed,
            fetch_attempts = summary.fetch_stats.attempts,
            "Total points collected"
        );
        Ok(summary)
    }
}
