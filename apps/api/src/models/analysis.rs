use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;
pub const MIN_RESUME_CHARS: usize = 100;

/// The two texts a match is computed from. Construction enforces the minimum
/// lengths, so everything downstream may assume them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    job_description: String,
    resume_text: String,
}

impl AnalysisInput {
    pub fn new(job_description: String, resume_text: String) -> Result<Self, AppError> {
        if job_description.chars().count() < MIN_JOB_DESCRIPTION_CHARS {
            return Err(AppError::Validation(format!(
                "Job description must be at least {MIN_JOB_DESCRIPTION_CHARS} characters long"
            )));
        }
        if resume_text.chars().count() < MIN_RESUME_CHARS {
            return Err(AppError::Validation(format!(
                "Resume text must be at least {MIN_RESUME_CHARS} characters long"
            )));
        }
        Ok(Self {
            job_description,
            resume_text,
        })
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn into_parts(self) -> (String, String) {
        (self.job_description, self.resume_text)
    }
}

/// Scored, explained alignment report. Produced by either the remote
/// provider path or the deterministic analyzer; scores are always 0–100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub match_score: u8,
    pub skill_match: u8,
    pub experience_match: u8,
    pub education_match: u8,
    pub keyword_match: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
    pub summary: String,
    pub is_ai_generated: bool,
}

/// Insert shape handed to an `AnalysisStore`.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub job_description: String,
    pub resume_text: String,
    pub result: AnalysisResult,
}

/// A persisted analysis. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub id: i64,
    pub job_description: String,
    pub resume_text: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl StoredAnalysis {
    /// Derived at the boundary, never stored.
    pub fn fallback_used(&self) -> bool {
        !self.result.is_ai_generated
    }
}
