//! Similarity Analyzer: deterministic resume/JD scorer with no network dependency.
//!
//! Used whenever a remote provider attempt fails. Same inputs always produce the
//! same `AnalysisResult`.
//!
//! Algorithm:
//! 1. Extract skill keywords from the JD; skill score = share present in the resume.
//! 2. Compare the first "<N> years" figure in the JD and resume for experience.
//! 3. Check the highest-priority degree term named in the JD against the resume.
//! 4. Jaccard overlap of the two token sets for the keyword score.
//! 5. match_score = 0.40·skill + 0.30·experience + 0.15·education + 0.15·keyword

use std::collections::HashSet;

use tracing::debug;

use crate::analysis::keywords::{first_years, tokenize, KeywordProfile, EDUCATION_TERMS};
use crate::models::analysis::{AnalysisInput, AnalysisResult};

pub const SKILL_WEIGHT: f64 = 0.40;
pub const EXPERIENCE_WEIGHT: f64 = 0.30;
pub const EDUCATION_WEIGHT: f64 = 0.15;
pub const KEYWORD_WEIGHT: f64 = 0.15;

/// Returned when the JD names no skills, so vague postings aren't penalized.
const NEUTRAL_SKILL_SCORE: u8 = 70;
/// Returned when the JD states no years requirement.
const NEUTRAL_EXPERIENCE_SCORE: u8 = 75;
/// Returned when the JD names no degree.
const NEUTRAL_EDUCATION_SCORE: u8 = 80;

const STRENGTH_THRESHOLD: u8 = 80;
const IMPROVEMENT_THRESHOLD: u8 = 70;

pub const RECOMMENDATIONS: [&str; 4] = [
    "Use keywords from the job description throughout your resume",
    "Quantify your achievements with specific metrics and results",
    "Tailor your summary to highlight the most relevant experience",
    "Include specific technologies and methodologies mentioned in the job posting",
];

/// The deterministic fallback analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityAnalyzer;

impl SimilarityAnalyzer {
    pub fn analyze(&self, input: &AnalysisInput) -> AnalysisResult {
        compute_similarity(input.job_description(), input.resume_text())
    }
}

/// The four dimension scores, each 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubScores {
    pub skill: u8,
    pub experience: u8,
    pub education: u8,
    pub keyword: u8,
}

impl SubScores {
    /// Weighted overall score.
    pub fn overall(&self) -> u8 {
        let weighted = f64::from(self.skill) * SKILL_WEIGHT
            + f64::from(self.experience) * EXPERIENCE_WEIGHT
            + f64::from(self.education) * EDUCATION_WEIGHT
            + f64::from(self.keyword) * KEYWORD_WEIGHT;
        weighted.round().clamp(0.0, 100.0) as u8
    }
}

pub fn compute_similarity(job_description: &str, resume_text: &str) -> AnalysisResult {
    let profile = KeywordProfile::extract(job_description);
    debug!(
        skills = ?profile.skills,
        experience = ?profile.experience,
        education = ?profile.education,
        "Extracted JD keyword profile"
    );

    let scores = SubScores {
        skill: skill_match(&profile.skills, resume_text),
        experience: experience_match(job_description, resume_text),
        education: education_match(job_description, resume_text),
        keyword: keyword_match(job_description, resume_text),
    };
    let match_score = scores.overall();

    AnalysisResult {
        match_score,
        skill_match: scores.skill,
        experience_match: scores.experience,
        education_match: scores.education,
        keyword_match: scores.keyword,
        strengths: build_strengths(&scores),
        improvements: build_improvements(&scores),
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
        summary: build_summary(match_score).to_string(),
        is_ai_generated: false,
    }
}

fn skill_match(skills: &[String], resume_text: &str) -> u8 {
    if skills.is_empty() {
        return NEUTRAL_SKILL_SCORE;
    }
    let resume_lower = resume_text.to_lowercase();
    let matched = skills
        .iter()
        .filter(|skill| resume_lower.contains(skill.as_str()))
        .count();
    percentage(matched, skills.len())
}

fn experience_match(job_description: &str, resume_text: &str) -> u8 {
    let Some(required) = first_years(job_description) else {
        return NEUTRAL_EXPERIENCE_SCORE;
    };
    let candidate = first_years(resume_text).unwrap_or(0.0);

    if candidate >= required {
        95
    } else if candidate >= required * 0.7 {
        80
    } else if candidate >= required * 0.5 {
        60
    } else {
        40
    }
}

fn education_match(job_description: &str, resume_text: &str) -> u8 {
    let jd_lower = job_description.to_lowercase();
    let Some(term) = EDUCATION_TERMS.iter().find(|t| jd_lower.contains(*t)) else {
        return NEUTRAL_EDUCATION_SCORE;
    };
    if resume_text.to_lowercase().contains(term) {
        90
    } else {
        50
    }
}

/// Jaccard similarity of the two token sets; 0 when both are empty.
fn keyword_match(job_description: &str, resume_text: &str) -> u8 {
    let jd_tokens: HashSet<String> = tokenize(job_description).into_iter().collect();
    let resume_tokens: HashSet<String> = tokenize(resume_text).into_iter().collect();

    let intersection = jd_tokens.intersection(&resume_tokens).count();
    let union = jd_tokens.union(&resume_tokens).count();
    if union == 0 {
        return 0;
    }
    percentage(intersection, union)
}

fn percentage(part: usize, whole: usize) -> u8 {
    ((part as f64 / whole as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

fn build_strengths(scores: &SubScores) -> Vec<String> {
    let mut strengths = Vec::new();
    if scores.skill >= STRENGTH_THRESHOLD {
        strengths.push("Strong technical skills alignment with job requirements".to_string());
    }
    if scores.experience >= STRENGTH_THRESHOLD {
        strengths.push("Experience level matches job expectations well".to_string());
    }
    if scores.education >= STRENGTH_THRESHOLD {
        strengths.push("Educational background aligns with position requirements".to_string());
    }
    if strengths.is_empty() {
        strengths.push("Resume shows relevant background for the position".to_string());
    }
    strengths
}

fn build_improvements(scores: &SubScores) -> Vec<String> {
    let mut improvements = Vec::new();
    if scores.skill < IMPROVEMENT_THRESHOLD {
        improvements.push(
            "Consider highlighting more technical skills mentioned in the job description"
                .to_string(),
        );
    }
    if scores.experience < IMPROVEMENT_THRESHOLD {
        improvements.push("Emphasize relevant experience and quantify achievements".to_string());
    }
    if scores.education < IMPROVEMENT_THRESHOLD {
        improvements
            .push("Consider adding relevant certifications or continuing education".to_string());
    }
    improvements
}

fn build_summary(match_score: u8) -> &'static str {
    if match_score >= 80 {
        "Excellent match! Your resume aligns very well with the job requirements."
    } else if match_score >= 60 {
        "Good match with some areas for improvement to strengthen your application."
    } else {
        "Moderate match. Consider tailoring your resume to better highlight relevant experience."
    }
}
