use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;
use crate::models::analysis::{AnalysisResult, NewAnalysis, StoredAnalysis};
use crate::store::AnalysisStore;

/// PostgreSQL-backed store over the `match_analyses` table.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MatchAnalysisRow {
    id: i64,
    job_description: String,
    resume_text: String,
    match_score: i32,
    skill_match: i32,
    experience_match: i32,
    education_match: i32,
    keyword_match: i32,
    strengths: Vec<String>,
    improvements: Vec<String>,
    recommendations: Vec<String>,
    summary: String,
    is_ai_generated: bool,
    created_at: DateTime<Utc>,
}

impl From<MatchAnalysisRow> for StoredAnalysis {
    fn from(row: MatchAnalysisRow) -> Self {
        StoredAnalysis {
            id: row.id,
            job_description: row.job_description,
            resume_text: row.resume_text,
            result: AnalysisResult {
                match_score: score_from_column(row.match_score),
                skill_match: score_from_column(row.skill_match),
                experience_match: score_from_column(row.experience_match),
                education_match: score_from_column(row.education_match),
                keyword_match: score_from_column(row.keyword_match),
                strengths: row.strengths,
                improvements: row.improvements,
                recommendations: row.recommendations,
                summary: row.summary,
                is_ai_generated: row.is_ai_generated,
            },
            created_at: row.created_at,
        }
    }
}

/// The table's CHECK constraints keep scores in range; clamp anyway so a bad
/// row can't wrap around.
fn score_from_column(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

#[async_trait]
impl AnalysisStore for PgStore {
    async fn create(&self, analysis: NewAnalysis) -> Result<StoredAnalysis, AppError> {
        let NewAnalysis {
            job_description,
            resume_text,
            result,
        } = analysis;

        let row = sqlx::query_as::<_, MatchAnalysisRow>(
            r#"
            INSERT INTO match_analyses
                (job_description, resume_text, match_score, skill_match, experience_match,
                 education_match, keyword_match, strengths, improvements, recommendations,
                 summary, is_ai_generated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&job_description)
        .bind(&resume_text)
        .bind(i32::from(result.match_score))
        .bind(i32::from(result.skill_match))
        .bind(i32::from(result.experience_match))
        .bind(i32::from(result.education_match))
        .bind(i32::from(result.keyword_match))
        .bind(&result.strengths)
        .bind(&result.improvements)
        .bind(&result.recommendations)
        .bind(&result.summary)
        .bind(result.is_ai_generated)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get(&self, id: i64) -> Result<Option<StoredAnalysis>, AppError> {
        let row = sqlx::query_as::<_, MatchAnalysisRow>("SELECT * FROM match_analyses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(StoredAnalysis::from))
    }

    async fn list_all(&self) -> Result<Vec<StoredAnalysis>, AppError> {
        let rows = sqlx::query_as::<_, MatchAnalysisRow>(
            "SELECT * FROM match_analyses ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StoredAnalysis::from).collect())
    }
}
