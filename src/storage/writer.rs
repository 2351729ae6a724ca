//! # Sample Writer
//!
//! Appends decoded batches to hourly sample files.
//!
//! Every append to one destination runs under that destination's lock, so the
//! "empty file? write header, append rows, flush" sequence is never
//! interleaved between two batches inside this process.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::path::destination;
use super::row::{header_row, sample_row};
use crate::error::{Result, SederError};
use crate::protocol::record::Record;

/// Appends record batches below a root data directory
///
/// Cheap to clone; clones share the per-file lock table.
#[derive(Debug, Clone)]
pub struct SampleWriter {
    root_dir: PathBuf,
    locks: Arc<LockTable>,
}

impl SampleWriter {
    /// Create a writer storing files below `root_dir`
    ///
    /// The directory is created lazily on the first append.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            locks: Arc::new(LockTable::default()),
        }
    }

    /// Root data directory
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// File a record would be appended to
    pub fn destination(&self, record: &Record) -> Result<PathBuf> {
        destination(&self.root_dir, record)
    }

    /// Append one batch
    ///
    /// The whole batch goes to the file named after its first record, even
    /// when later records fall into another hour. A header row is written
    /// first if the file is empty.
    ///
    /// # Returns
    ///
    /// * `Result<Option<PathBuf>>` - The file written, or `None` for an empty
    ///   batch (no filesystem access happens in that case)
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if creating directories, opening, inspecting or
    /// writing the file fails. Rows flushed before the failure stay on disk.
    pub fn append(&self, records: &[Record]) -> Result<Option<PathBuf>> {
        let Some(first) = records.first() else {
            return Ok(None);
        };

        let path = self.destination(first)?;
        let lock = self.locks.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| SederError::io(dir, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SederError::io(&path, e))?;
        let existing_len = file.metadata().map_err(|e| SederError::io(&path, e))?.len();

        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);

        if existing_len == 0 {
            debug!("Starting new sample file {}", path.display());
            writer
                .write_byte_record(&header_row(first.channel_count()))
                .map_err(|e| SederError::io(&path, e))?;
        }

        for record in records {
            writer
                .write_byte_record(&sample_row(record))
                .map_err(|e| SederError::io(&path, e))?;
        }

        writer.flush().map_err(|e| SederError::io(&path, e))?;

        debug!("Appended {} records to {}", records.len(), path.display());
        Ok(Some(path))
    }
}

/// One mutex per destination file
///
/// Entries nobody holds are dropped on the next lookup, so the table only
/// grows with the number of files being written at the same time.
#[derive(Debug, Default)]
struct LockTable {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl LockTable {
    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(path.to_path_buf()).or_default().clone()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}
