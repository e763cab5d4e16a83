// src/storage/mod.rs
pub mod ledger;

use crate::extractors::models::{ExperienceEntry, ResumeRecord};
use crate::utils::error::StorageError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub use ledger::{already_processed, Ledger};

/// Column header of the output store. The first column is the dedup key.
pub const HEADER: [&str; 6] = ["filename", "Name", "Email", "Phone", "Skills", "Experience"];
pub const FILENAME_COLUMN: &str = "filename";

const SKILL_SEPARATOR: &str = ", ";
const EXPERIENCE_SEPARATOR: &str = " | ";

/// Append-only CSV file holding one row per processed resume.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the filenames already present in the store.
    pub fn ledger(&self) -> Result<Ledger, StorageError> {
        Ledger::open(&self.path)
    }

    /// Creates the store with just the header if it is missing or empty.
    pub fn ensure_exists(&self) -> Result<(), StorageError> {
        self.write_rows(None)
    }

    /// Appends a single row for `record`, writing the header first when the
    /// store is missing or empty.
    ///
    /// The header and row are encoded up front and written in one call. If
    /// the write fails the file is truncated back to its previous length, so
    /// a failed append never leaves a partial row behind.
    pub fn append(&self, record: &ResumeRecord) -> Result<(), StorageError> {
        self.write_rows(Some(record))?;
        tracing::info!("Appended row for {} to {}", record.source_filename, self.path.display());
        Ok(())
    }

    fn write_rows(&self, record: Option<&ResumeRecord>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;

        let original_len = file.metadata().map_err(|e| self.write_error(e))?.len();
        let needs_header = original_len == 0;
        if record.is_none() && !needs_header {
            return Ok(());
        }

        let mut payload = Vec::new();
        if !needs_header && !ends_with_newline(&mut file, original_len).map_err(|e| self.write_error(e))? {
            payload.push(b'\n');
        }
        payload.extend(encode_rows(record, needs_header).map_err(|e| self.write_error(e))?);

        write_or_roll_back(&mut file, &payload, original_len).map_err(|e| self.write_error(e))
    }

    fn write_error(&self, err: impl ToString) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

/// Destination of an append that can be cut back to an earlier length.
trait Truncate: Write {
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl Truncate for File {
    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

/// Writes `payload` in full and syncs it, or truncates `sink` back to
/// `original_len` and returns the write error.
fn write_or_roll_back<S: Truncate>(sink: &mut S, payload: &[u8], original_len: u64) -> io::Result<()> {
    let written = sink
        .write_all(payload)
        .and_then(|_| sink.flush())
        .and_then(|_| sink.sync());

    if let Err(e) = written {
        if let Err(rollback) = sink.truncate_to(original_len) {
            tracing::error!(
                "Failed to roll back to {} bytes after write error: {}",
                original_len,
                rollback
            );
        }
        return Err(e);
    }
    Ok(())
}

fn ends_with_newline(file: &mut File, len: u64) -> io::Result<bool> {
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// CSV-encodes the optional header plus the record's row.
fn encode_rows(record: Option<&ResumeRecord>, with_header: bool) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if with_header {
        writer.write_record(HEADER)?;
    }
    if let Some(record) = record {
        writer.write_record(row_fields(record))?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Renders a record as the store's six columns. Empty sentinel values stay empty cells.
pub fn row_fields(record: &ResumeRecord) -> [String; 6] {
    let profile = &record.profile;
    [
        record.source_filename.clone(),
        profile.full_name.clone(),
        profile.email.clone(),
        profile.phone.clone(),
        profile.skills.join(SKILL_SEPARATOR),
        profile
            .experience
            .iter()
            .map(format_experience)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(EXPERIENCE_SEPARATOR),
    ]
}

/// "Title at Company (Dates)", leaving out whichever parts are unknown.
fn format_experience(entry: &ExperienceEntry) -> String {
    let mut text = match (entry.title.is_empty(), entry.company.is_empty()) {
        (false, false) => format!("{} at {}", entry.title, entry.company),
        (false, true) => entry.title.clone(),
        (true, false) => entry.company.clone(),
        (true, true) => String::new(),
    };
    if !entry.dates.is_empty() {
        if text.is_empty() {
            text = entry.dates.clone();
        } else {
            text.push_str(&format!(" ({})", entry.dates));
        }
    }
    text
}
