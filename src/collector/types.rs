use crate::market_data::client::FetchStats;
use crate::persist::PersistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    Running,
    Flushing,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Recorded { flushed: bool },
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    pub total_processed: u64,
    pub batches_flushed: u64,
    pub stop_reason: StopReason,
    pub fetch_stats: FetchStats,
}

#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("failed to flush batch {batch_number} ({records} records, {total_processed} collected): {source}")]
    Flush {
        batch_number: u64,
        records: usize,
        total_processed: u64,
        #[source]
        source: PersistError,
    },
    #[error("collector is stopped")]
    Stopped,
}
