use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobDraft, JobPosting, JobRow};

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<JobPosting>, AppError>;
    async fn list(&self) -> Result<Vec<JobPosting>, AppError>;
    async fn create(&self, created_by: Uuid, draft: JobDraft) -> Result<JobPosting, AppError>;
    /// Returns `None` if the job no longer exists.
    async fn update(&self, id: Uuid, draft: JobDraft) -> Result<Option<JobPosting>, AppError>;
    /// Deletes the job together with its applications and returns their
    /// resume paths, or `None` if the job does not exist.
    async fn delete(&self, id: Uuid) -> Result<Option<Vec<String>>, AppError>;
}

/// `getJob(id) -> JobPosting | NotFound`.
pub async fn require_job(jobs: &dyn JobStore, id: Uuid) -> Result<JobPosting, AppError> {
    jobs.get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn get(&self, id: Uuid) -> Result<Option<JobPosting>, AppError> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(JobPosting::try_from)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<JobPosting>, AppError> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(JobPosting::try_from)
            .collect()
    }

    async fn create(&self, created_by: Uuid, draft: JobDraft) -> Result<JobPosting, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, title, description, skills, min_experience,
                 salary_min, salary_max, location, job_type, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.skills)
        .bind(draft.min_experience)
        .bind(draft.salary_min)
        .bind(draft.salary_max)
        .bind(&draft.location)
        .bind(draft.job_type.as_str())
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        JobPosting::try_from(row)
    }

    async fn update(&self, id: Uuid, draft: JobDraft) -> Result<Option<JobPosting>, AppError> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
            SET title = $2, description = $3, skills = $4, min_experience = $5,
                salary_min = $6, salary_max = $7, location = $8, job_type = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.skills)
        .bind(draft.min_experience)
        .bind(draft.salary_min)
        .bind(draft.salary_max)
        .bind(&draft.location)
        .bind(draft.job_type.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(JobPosting::try_from)
        .transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Vec<String>>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Holding the row lock makes concurrent applications (whose foreign-key
        // check needs a share lock on it) wait until the delete commits.
        let locked = sqlx::query("SELECT id FROM jobs WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let resume_paths: Vec<String> =
            sqlx::query_scalar("DELETE FROM candidates WHERE job_id = $1 RETURNING resume_path")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(resume_paths))
    }
}
