pub mod types;
pub use types::*;
pub mod csv_sink;
pub use csv_sink::CsvSink;

use crate::engine::types::SlippageRecord;

/// Destination for flushed batches.
pub trait RecordSink {
    /// Persist `batch`. The first batch of a run starts the output from scratch.
    fn append(&mut self, batch: &[SlippageRecord], is_first_batch: bool) -> PersistResult<()>;
}
