use std::sync::Arc;

use crate::analysis::orchestrator::AnalysisOrchestrator;
use crate::store::AnalysisStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable store. `PgStore` when DATABASE_URL is set, `MemoryStore` otherwise.
    pub store: Arc<dyn AnalysisStore>,
    pub orchestrator: AnalysisOrchestrator,
}
