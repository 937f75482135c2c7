use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateRow, CandidateStatus, NewCandidate};

#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn create(&self, candidate: NewCandidate) -> Result<Candidate, AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<Candidate>, AppError>;
    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<Candidate>, AppError>;
    /// Newest first.
    async fn list_by_applicant(&self, user_id: Uuid) -> Result<Vec<Candidate>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_candidates(rows: Vec<CandidateRow>) -> Result<Vec<Candidate>, AppError> {
    rows.into_iter().map(Candidate::try_from).collect()
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn create(&self, candidate: NewCandidate) -> Result<Candidate, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates
                (id, job_id, name, email, status, resume_path,
                 match_score, match_reason, ai_summary, added_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(candidate.job_id)
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(CandidateStatus::default().as_str())
        .bind(&candidate.resume_path)
        .bind(i32::from(candidate.match_score))
        .bind(&candidate.match_reason)
        .bind(&candidate.ai_summary)
        .bind(candidate.added_by)
        .fetch_one(&self.pool)
        .await?;

        Candidate::try_from(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Candidate>, AppError> {
        sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Candidate::try_from)
            .transpose()
    }

    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<Candidate>, AppError> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            "SELECT * FROM candidates WHERE job_id = $1 ORDER BY match_score DESC, created_at",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        into_candidates(rows)
    }

    async fn list_by_applicant(&self, user_id: Uuid) -> Result<Vec<Candidate>, AppError> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            "SELECT * FROM candidates WHERE added_by = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        into_candidates(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
