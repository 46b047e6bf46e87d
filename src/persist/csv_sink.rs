//! Batch CSV output.
//!
//! The first batch truncates the file and writes the header; later batches
//! append rows only. Every call is flushed before returning.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::types::SlippageRecord;
use crate::persist::types::{PersistResult, CSV_COLUMNS};
use crate::persist::RecordSink;

pub struct CsvSink {
    path: PathBuf,
    rows_written: u64,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), rows_written: 0 }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written by this sink since it was created.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    fn open(&self, is_first_batch: bool) -> std::io::Result<File> {
        if is_first_batch {
            OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)
        } else {
            OpenOptions::new().create(true).append(true).open(&self.path)
        }
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, batch: &[SlippageRecord], is_first_batch: bool) -> PersistResult<()> {
        let file = self.open(is_first_batch)?;
        // Header is written by hand so an empty first batch still produces one
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_first_batch {
            writer.write_record(CSV_COLUMNS)?;
        }
        for record in batch {
            writer.serialize(record)?;
        }
        writer.flush()?;

        self.rows_written += batch.len() as u64;
        debug!(path = %self.path.display(), rows = batch.len(), header = is_first_batch, "Appended batch");
        Ok(())
    }
}
