//! Persistence of analysis records.
//!
//! `AppState` holds an `Arc<dyn AnalysisStore>`: `PgStore` when a database is
//! configured, `MemoryStore` otherwise. Records are created once and never
//! updated or deleted by the service.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::analysis::{NewAnalysis, StoredAnalysis};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Persists the analysis, assigning its id and creation time.
    async fn create(&self, analysis: NewAnalysis) -> Result<StoredAnalysis, AppError>;

    async fn get(&self, id: i64) -> Result<Option<StoredAnalysis>, AppError>;

    /// All analyses, newest first.
    async fn list_all(&self) -> Result<Vec<StoredAnalysis>, AppError>;
}
