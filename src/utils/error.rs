// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Errors raised while turning a file on disk into raw text
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported document format for {}: '{extension}'", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Could not read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LoadError::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

// Errors raised by the structured extraction call
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Extraction request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Extraction request timed out")]
    Timeout,

    #[error("Extraction API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Extraction API returned no content")]
    EmptyContent,

    #[error("Could not parse extraction response: {0}")]
    Parse(String),

    #[error("Extraction response contained no candidate data")]
    EmptyProfile,
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExtractError::Timeout
        } else {
            ExtractError::Network(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not read output store {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Could not write to output store {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// A failure confined to a single input file. The pipeline reports it and
/// moves on to the next file.
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Write(#[from] StorageError),
}

impl FileError {
    /// Pipeline stage at which the file failed, for log lines and the summary.
    pub fn stage(&self) -> &'static str {
        match self {
            FileError::Load(_) => "load",
            FileError::Extraction(_) => "extract",
            FileError::Write(_) => "persist",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
