//! Keyword pattern tables and extractors used by the similarity analyzer.
//!
//! Patterns are matched case-insensitively and without word boundaries, so
//! `api` also hits `rapid`. Matches are lowercased and deduplicated in
//! first-seen order.

use once_cell::sync::Lazy;
use regex::Regex;

static SKILL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        // cue phrase plus the rest of the clause
        r"(?i)(?:experience with|proficient in|knowledge of|skills in|familiar with)\s+[^.;,]+",
        r"(?i)(?:javascript|python|java|react|node\.js|html|css|sql|aws|docker|kubernetes|git)",
        r"(?i)(?:typescript|vue|angular|mongodb|postgresql|redis|microservices|api|rest|graphql)",
    ])
});

static EXPERIENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)[0-9]+\s*\+?\s*years?\s+(?:of\s+)?experience",
        r"(?i)senior|junior|lead|principal|architect|manager",
    ])
});

static EDUCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[r"(?i)bachelor|master|phd|degree|computer science|engineering|mathematics"])
});

static YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*\+?\s*years").expect("years pattern compiles"));

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("non-word pattern compiles"));

/// Degree terms checked by the education score, highest priority first.
pub const EDUCATION_TERMS: [&str; 4] = ["bachelor", "master", "phd", "degree"];

/// Keyword sets pulled from a job description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordProfile {
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
}

impl KeywordProfile {
    pub fn extract(job_description: &str) -> Self {
        Self {
            skills: extract_skill_keywords(job_description),
            experience: extract_experience_keywords(job_description),
            education: extract_education_keywords(job_description),
        }
    }
}

pub fn extract_skill_keywords(text: &str) -> Vec<String> {
    collect_matches(&SKILL_PATTERNS, text)
}

pub fn extract_experience_keywords(text: &str) -> Vec<String> {
    collect_matches(&EXPERIENCE_PATTERNS, text)
}

pub fn extract_education_keywords(text: &str) -> Vec<String> {
    collect_matches(&EDUCATION_PATTERNS, text)
}

/// Number in the first "<N> years" / "<N>+ years" phrase, if any.
pub fn first_years(text: &str) -> Option<f64> {
    YEARS
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Lowercases, blanks out punctuation, splits on whitespace and drops tokens
/// of two characters or fewer.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

fn collect_matches(patterns: &[Regex], text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for pattern in patterns {
        for m in pattern.find_iter(text) {
            let keyword = m.as_str().to_lowercase();
            if !found.contains(&keyword) {
                found.push(keyword);
            }
        }
    }
    found
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("keyword pattern compiles"))
        .collect()
}
