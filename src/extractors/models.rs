// src/extractors/models.rs
use crate::utils::error::{ExtractError, StorageError};
use serde::Deserialize;

/// One position from the candidate's work history.
/// Empty strings mean the model could not find that detail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub dates: String,
}

impl ExperienceEntry {
    fn is_blank(&self) -> bool {
        self.title.is_empty() && self.company.is_empty() && self.dates.is_empty()
    }
}

/// Candidate data as returned by an extractor, before it is tied to a file.
///
/// Missing scalars are the empty string and missing lists are empty; the
/// storage layer writes those as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
}

impl CandidateProfile {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty()
            && self.skills.is_empty()
            && self.experience.is_empty()
    }
}

/// A profile bound to the input file it came from. `source_filename` is the
/// store's unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRecord {
    pub source_filename: String,
    pub profile: CandidateProfile,
}

impl ResumeRecord {
    pub fn new(source_filename: impl Into<String>, profile: CandidateProfile) -> Result<Self, StorageError> {
        let source_filename = source_filename.into();
        if source_filename.trim().is_empty() {
            return Err(StorageError::InvalidRecord("source filename is empty".to_string()));
        }
        Ok(Self { source_filename, profile })
    }
}

// --- Wire format expected back from the model ---

#[derive(Debug, Deserialize)]
struct WireProfile {
    name: Option<String>,
    contact: Option<WireContact>,
    skills: Option<Vec<Option<String>>>,
    experience: Option<Vec<WireExperience>>,
}

#[derive(Debug, Deserialize)]
struct WireContact {
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireExperience {
    job_title: Option<String>,
    company_name: Option<String>,
    duration_dates: Option<String>,
}

fn clean(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Parses the model's JSON answer into a profile.
///
/// Absent and `null` fields become the empty sentinel. A field of the wrong
/// type, a non-object document, or a profile with nothing in it is an error.
pub fn parse_profile(raw: &str) -> Result<CandidateProfile, ExtractError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ExtractError::Parse(format!("invalid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ExtractError::Parse("expected a JSON object at the top level".to_string()));
    }

    let wire: WireProfile = serde_json::from_value(value)
        .map_err(|e| ExtractError::Parse(format!("unexpected response shape: {}", e)))?;

    let (email, phone) = match wire.contact {
        Some(contact) => (clean(contact.email), clean(contact.phone)),
        None => (String::new(), String::new()),
    };

    let skills = wire
        .skills
        .unwrap_or_default()
        .into_iter()
        .map(clean)
        .filter(|s| !s.is_empty())
        .collect();

    let experience = wire
        .experience
        .unwrap_or_default()
        .into_iter()
        .map(|e| ExperienceEntry {
            title: clean(e.job_title),
            company: clean(e.company_name),
            dates: clean(e.duration_dates),
        })
        .filter(|e| !e.is_blank())
        .collect();

    let profile = CandidateProfile {
        full_name: clean(wire.name),
        email,
        phone,
        skills,
        experience,
    };

    if profile.is_empty() {
        return Err(ExtractError::EmptyProfile);
    }
    Ok(profile)
}
