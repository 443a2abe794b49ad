//! Turns a provider's free-form reply into an `AnalysisResult`.
//!
//! Providers often wrap the JSON in prose or code fences, so the object is
//! located heuristically. Swapping that heuristic for a structured-output
//! mode only touches `extract_first_json_object`.

use serde_json::{Map, Value};

use crate::models::analysis::AnalysisResult;
use crate::providers::ProviderError;

pub const SCORE_FIELDS: [&str; 5] = [
    "matchScore",
    "skillMatch",
    "experienceMatch",
    "educationMatch",
    "keywordMatch",
];

pub const LIST_FIELDS: [&str; 3] = ["strengths", "improvements", "recommendations"];

pub const REQUIRED_FIELDS: [&str; 9] = [
    "matchScore",
    "skillMatch",
    "experienceMatch",
    "educationMatch",
    "keywordMatch",
    "strengths",
    "improvements",
    "recommendations",
    "summary",
];

/// Parses the text between the first `{` and the last `}` as a JSON object.
pub fn extract_first_json_object(text: &str) -> Result<Map<String, Value>, ProviderError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let candidate = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(ProviderError::ResponseFormat(
                "no JSON object found in response".to_string(),
            ))
        }
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ProviderError::ResponseFormat(
            "response JSON is not an object".to_string(),
        )),
        Err(e) => Err(ProviderError::ResponseFormat(format!(
            "invalid JSON in response: {e}"
        ))),
    }
}

/// Extracts, validates and normalizes a provider reply.
///
/// Every required field must be present (`null` counts as present). Scores are
/// clamped into 0–100 and rounded; non-array lists become empty.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, ProviderError> {
    let object = extract_first_json_object(text)?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
        return Err(ProviderError::ResponseFormat(format!(
            "missing required field: {missing}"
        )));
    }

    let score = |field: &str| object.get(field).map(clamp_score).unwrap_or(0);
    let list = |field: &str| object.get(field).map(coerce_list).unwrap_or_default();

    Ok(AnalysisResult {
        match_score: score(SCORE_FIELDS[0]),
        skill_match: score(SCORE_FIELDS[1]),
        experience_match: score(SCORE_FIELDS[2]),
        education_match: score(SCORE_FIELDS[3]),
        keyword_match: score(SCORE_FIELDS[4]),
        strengths: list(LIST_FIELDS[0]),
        improvements: list(LIST_FIELDS[1]),
        recommendations: list(LIST_FIELDS[2]),
        summary: object.get("summary").map(coerce_text).unwrap_or_default(),
        is_ai_generated: true,
    })
}

/// `round(clamp(n, 0, 100))`; anything non-numeric scores 0.
fn clamp_score(value: &Value) -> u8 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .map(|n| n.clamp(0.0, 100.0).round() as u8)
        .unwrap_or(0)
}

fn coerce_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(coerce_text)
            .collect(),
        _ => Vec::new(),
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
