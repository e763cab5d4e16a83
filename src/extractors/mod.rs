// src/extractors/mod.rs
pub mod models;
pub mod openai;
pub mod prompt;

use crate::utils::error::ExtractError;
use async_trait::async_trait;

pub use models::{CandidateProfile, ExperienceEntry, ResumeRecord};
pub use openai::{ExtractorConfig, OpenAiExtractor};

/// Turns raw resume text into a structured profile.
///
/// The pipeline only talks to this trait, so the network-backed
/// `OpenAiExtractor` can be swapped for a deterministic stand-in.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<CandidateProfile, ExtractError>;
}
