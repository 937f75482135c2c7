use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::{Feedback, Interview, InterviewRow, InterviewStatus, NewInterview};

#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn create(&self, interview: NewInterview) -> Result<Interview, AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<Interview>, AppError>;
    async fn list_all(&self) -> Result<Vec<Interview>, AppError>;
    async fn list_by_interviewer(&self, interviewer_id: Uuid) -> Result<Vec<Interview>, AppError>;
    async fn list_by_candidates(&self, candidate_ids: &[Uuid]) -> Result<Vec<Interview>, AppError>;
    /// Stores feedback and marks the interview `Completed`.
    async fn record_feedback(
        &self,
        id: Uuid,
        feedback: Feedback,
    ) -> Result<Option<Interview>, AppError>;
}

#[derive(Clone)]
pub struct PgInterviewStore {
    pool: PgPool,
}

impl PgInterviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_interviews(rows: Vec<InterviewRow>) -> Result<Vec<Interview>, AppError> {
    rows.into_iter().map(Interview::try_from).collect()
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn create(&self, interview: NewInterview) -> Result<Interview, AppError> {
        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            INSERT INTO interviews
                (id, job_id, candidate_id, interviewer_id, scheduled_at, mode, meeting_link, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(interview.job_id)
        .bind(interview.candidate_id)
        .bind(interview.interviewer_id)
        .bind(interview.scheduled_at)
        .bind(interview.mode.as_str())
        .bind(&interview.meeting_link)
        .bind(InterviewStatus::Scheduled.as_str())
        .fetch_one(&self.pool)
        .await?;

        Interview::try_from(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Interview>, AppError> {
        sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Interview::try_from)
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Interview>, AppError> {
        let rows = sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews ORDER BY scheduled_at",
        )
        .fetch_all(&self.pool)
        .await?;
        into_interviews(rows)
    }

    async fn list_by_interviewer(&self, interviewer_id: Uuid) -> Result<Vec<Interview>, AppError> {
        let rows = sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE interviewer_id = $1 ORDER BY scheduled_at",
        )
        .bind(interviewer_id)
        .fetch_all(&self.pool)
        .await?;
        into_interviews(rows)
    }

    async fn list_by_candidates(&self, candidate_ids: &[Uuid]) -> Result<Vec<Interview>, AppError> {
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE candidate_id = ANY($1) ORDER BY scheduled_at",
        )
        .bind(candidate_ids)
        .fetch_all(&self.pool)
        .await?;
        into_interviews(rows)
    }

    async fn record_feedback(
        &self,
        id: Uuid,
        feedback: Feedback,
    ) -> Result<Option<Interview>, AppError> {
        sqlx::query_as::<_, InterviewRow>(
            r#"
            UPDATE interviews
            SET feedback_rating = $2, feedback_comments = $3, feedback_decision = $4, status = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(feedback.rating.map(i16::from))
        .bind(&feedback.comments)
        .bind(feedback.decision.as_str())
        .bind(InterviewStatus::Completed.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(Interview::try_from)
        .transpose()
    }
}
