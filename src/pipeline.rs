// src/pipeline.rs
use crate::extractors::{Extractor, ResumeRecord};
use crate::loader::{self, DocumentFormat};
use crate::storage::ResultStore;
use crate::utils::error::{AppError, FileError, LoadError};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned (non-recursively) for resumes
    pub input_dir: PathBuf,
    /// CSV store that doubles as the dedup ledger
    pub output_file: PathBuf,
}

/// A file the pipeline gave up on during this run.
#[derive(Debug)]
pub struct FileFailure {
    pub filename: String,
    pub error: FileError,
}

/// Outcome of one pass over the input directory.
#[derive(Debug, Default)]
pub struct RunReport {
    pub discovered: usize,
    pub persisted: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<FileFailure>,
}

impl RunReport {
    /// Number of files that were loaded or extracted this run (not skipped).
    pub fn attempted(&self) -> usize {
        self.persisted.len() + self.failures.len()
    }
}

/// Drives every resume in the input directory through load, extract and append.
///
/// Files run strictly one after another. The ledger is consulted before any
/// work is done on a file, and a failure on one file never stops the run.
pub struct Pipeline {
    config: PipelineConfig,
    extractor: Arc<dyn Extractor>,
    store: ResultStore,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, extractor: Arc<dyn Extractor>) -> Self {
        let store = ResultStore::new(&config.output_file);
        Self {
            config,
            extractor,
            store,
        }
    }

    pub async fn run(&self) -> Result<RunReport, AppError> {
        let files = match self.discover()? {
            Some(files) => files,
            None => {
                self.store.ensure_exists()?;
                return Ok(RunReport::default());
            }
        };

        let mut ledger = self.store.ledger()?;
        self.store.ensure_exists()?;
        tracing::info!(
            "Found {} resume file(s) in {}; {} already recorded in {}",
            files.len(),
            self.config.input_dir.display(),
            ledger.len(),
            self.store.path().display()
        );

        let mut report = RunReport {
            discovered: files.len(),
            ..RunReport::default()
        };

        for path in files {
            // Ledger keys are exact names; a name that is not UTF-8 has no key
            let filename = match path.file_name().and_then(OsStr::to_str) {
                Some(name) => name.to_string(),
                None => {
                    let error = FileError::Load(LoadError::read(&path, "file name is not valid UTF-8"));
                    let filename = path.display().to_string();
                    tracing::error!("Failed to process {} at {} stage: {}", filename, error.stage(), error);
                    report.failures.push(FileFailure { filename, error });
                    continue;
                }
            };

            if ledger.contains(&filename) {
                tracing::info!("Skipping {} - already processed", filename);
                report.skipped.push(filename);
                continue;
            }

            tracing::info!("Processing {}", filename);
            match self.process_file(&path, &filename).await {
                Ok(record) => {
                    ledger.record(record.source_filename);
                    report.persisted.push(filename);
                }
                Err(error) => {
                    tracing::error!("Failed to process {} at {} stage: {}", filename, error.stage(), error);
                    report.failures.push(FileFailure { filename, error });
                }
            }
        }

        Ok(report)
    }

    /// Load -> extract -> persist for a single file.
    async fn process_file(&self, path: &Path, filename: &str) -> Result<ResumeRecord, FileError> {
        let text = loader::load(path)?;
        tracing::debug!("Loaded {} ({} characters)", filename, text.len());

        let profile = self.extractor.extract(&text).await?;
        tracing::debug!("Extracted profile for {}: {:?}", filename, profile);

        let record = ResumeRecord::new(filename, profile)?;
        self.store.append(&record)?;
        Ok(record)
    }

    /// Lists supported resume files, sorted by name.
    ///
    /// Returns `None` when the input directory did not exist; it is created
    /// so the user has somewhere to put resumes for the next run. Names that
    /// are not valid UTF-8 are still listed so the run can report them.
    fn discover(&self) -> Result<Option<Vec<PathBuf>>, AppError> {
        let dir = &self.config.input_dir;
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            tracing::warn!("Created '{}' directory. Place resume files there and run again.", dir.display());
            return Ok(None);
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if DocumentFormat::from_path(&path).is_none() {
                tracing::debug!("Ignoring {} (not a .txt, .pdf or .docx file)", path.display());
                continue;
            }
            files.push(path);
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if files.is_empty() {
            tracing::warn!("No resume files found in {}", dir.display());
        }
        Ok(Some(files))
    }
}
