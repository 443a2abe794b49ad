use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::analysis::{NewAnalysis, StoredAnalysis};
use crate::store::AnalysisStore;

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    analyses: BTreeMap<i64, StoredAnalysis>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn create(&self, analysis: NewAnalysis) -> Result<StoredAnalysis, AppError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let stored = StoredAnalysis {
            id: inner.last_id,
            job_description: analysis.job_description,
            resume_text: analysis.resume_text,
            result: analysis.result,
            created_at: Utc::now(),
        };
        inner.analyses.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Option<StoredAnalysis>, AppError> {
        Ok(self.inner.read().await.analyses.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<StoredAnalysis>, AppError> {
        let inner = self.inner.read().await;
        let mut all: Vec<StoredAnalysis> = inner.analyses.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::similarity::compute_similarity;

    fn new_analysis(tag: &str) -> NewAnalysis {
        NewAnalysis {
            job_description: format!("jd {tag}"),
            resume_text: format!("resume {tag}"),
            result: compute_similarity("Python developer", "Python"),
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let store = MemoryStore::new();
        let first = store.create(new_analysis("a")).await.unwrap();
        let second = store.create(new_analysis("b")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_get_returns_stored_record() {
        let store = MemoryStore::new();
        let created = store.create(new_analysis("a")).await.unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(store.get(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_is_newest_first() {
        let store = MemoryStore::new();
        for tag in ["a", "b", "c"] {
            store.create(new_analysis(tag)).await.unwrap();
        }
        let ids: Vec<i64> = store
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        assert!(MemoryStore::new().list_all().await.unwrap().is_empty());
    }
}
