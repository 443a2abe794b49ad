// Match analysis: deterministic similarity scoring, provider orchestration
// with fallback, and the HTTP handlers that persist and serve results.

pub mod handlers;
pub mod keywords;
pub mod orchestrator;
pub mod similarity;
