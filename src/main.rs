// src/main.rs
use clap::Parser;
use resume_extractor::extractors::openai::{DEFAULT_API_BASE, DEFAULT_MODEL};
use resume_extractor::extractors::{ExtractorConfig, OpenAiExtractor};
use resume_extractor::pipeline::{Pipeline, PipelineConfig};
use resume_extractor::utils::{self, AppError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Extracts candidate details from resumes into a CSV file, skipping files
/// that already have a row.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing .txt, .pdf and .docx resumes
    #[arg(short, long, env = "RESUME_INPUT_DIR", default_value = "resumes")]
    input_dir: PathBuf,

    /// CSV file rows are appended to (also used to detect processed files)
    #[arg(short, long, env = "RESUME_OUTPUT_FILE", default_value = "resume_details.csv")]
    output: PathBuf,

    /// API key for the extraction service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat model used for extraction
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Per-request timeout for the extraction call, in seconds
    #[arg(long, env = "OPENAI_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,
}

impl Args {
    fn extractor_config(&self) -> Result<ExtractorConfig, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::Config("OpenAI API key not found. Set OPENAI_API_KEY or pass --api-key.".to_string())
            })?;

        if self.timeout_secs == 0 {
            return Err(AppError::Config("--timeout-secs must be greater than zero".to_string()));
        }

        let mut config = ExtractorConfig::new(api_key);
        config.model = self.model.clone();
        config.api_base = self.api_base.clone();
        config.timeout = Duration::from_secs(self.timeout_secs);
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Pick up a local .env so RUST_LOG and clap's env fallbacks see it
    let dotenv = dotenvy::dotenv();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();
    if let Ok(path) = &dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let args = Args::parse();
    tracing::info!(
        "Starting run: input_dir={}, output={}, model={}",
        args.input_dir.display(),
        args.output.display(),
        args.model
    );

    // 3. Build the extractor from explicit configuration
    let extractor_config = args.extractor_config()?;
    tracing::debug!("Extractor configuration: {:?}", extractor_config);
    let extractor = OpenAiExtractor::new(extractor_config)?;

    // 4. Run the pipeline once over the input directory
    let pipeline = Pipeline::new(
        PipelineConfig {
            input_dir: args.input_dir,
            output_file: args.output,
        },
        Arc::new(extractor),
    );
    let report = pipeline.run().await?;

    tracing::info!(
        "Processing finished. Discovered: {}, Persisted: {}, Skipped: {}, Failures: {}",
        report.discovered,
        report.persisted.len(),
        report.skipped.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        tracing::warn!("  {} ({} stage): {}", failure.filename, failure.error.stage(), failure.error);
    }

    if report.persisted.is_empty() && !report.failures.is_empty() {
        return Err(AppError::Processing(format!(
            "Failed to process any of the {} attempted resume(s)",
            report.attempted()
        )));
    }

    Ok(())
}
