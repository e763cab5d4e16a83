// src/storage/ledger.rs
use crate::storage::FILENAME_COLUMN;
use crate::utils::error::StorageError;
use std::collections::HashSet;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Set of source filenames already present in the output store.
#[derive(Debug, Default)]
pub struct Ledger {
    filenames: HashSet<String>,
}

impl Ledger {
    /// Loads the filename column of the store at `store`.
    ///
    /// A missing store yields an empty ledger. A store that exists but cannot
    /// be read is an error: treating it as empty would let processed files
    /// through a second time.
    pub fn open(store: &Path) -> Result<Self, StorageError> {
        let read_error = |reason: String| StorageError::Read {
            path: store.to_path_buf(),
            reason,
        };

        let file = match File::open(store) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No output store at {}, starting with an empty ledger", store.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(read_error(e.to_string())),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let column = reader
            .headers()
            .map_err(|e| read_error(e.to_string()))?
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(FILENAME_COLUMN))
            .unwrap_or(0);

        let mut filenames = HashSet::new();
        for result in reader.records() {
            let record = result.map_err(|e| read_error(e.to_string()))?;
            if let Some(filename) = record.get(column).filter(|f| !f.is_empty()) {
                filenames.insert(filename.to_string());
            }
        }

        tracing::debug!("Ledger loaded {} processed filenames from {}", filenames.len(), store.display());
        Ok(Self { filenames })
    }

    /// Exact-match membership test.
    pub fn contains(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    /// Marks `filename` as processed after its row has been written.
    pub fn record(&mut self, filename: impl Into<String>) {
        self.filenames.insert(filename.into());
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

/// Whether `filename` already has a row in the store at `store`.
///
/// One-off form of `Ledger::open(store)?.contains(filename)`; it rereads the
/// store on every call. The pipeline opens a [`Ledger`] once per run instead
/// and records each new row in it.
pub fn already_processed(store: &Path, filename: &str) -> Result<bool, StorageError> {
    Ok(Ledger::open(store)?.contains(filename))
}
