//! Axum route handlers for job postings.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Identity;
use crate::jobs::store::require_job;
use crate::models::job::{JobDraft, JobPosting};
use crate::state::AppState;

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    Ok(Json(state.jobs.list().await?))
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobPosting>, AppError> {
    Ok(Json(require_job(state.jobs.as_ref(), job_id).await?))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    identity: Identity,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    if !identity.can_recruit() {
        return Err(AppError::Forbidden(
            "Only recruiters can post jobs".to_string(),
        ));
    }
    let job = state
        .jobs
        .create(identity.user_id, draft.normalized()?)
        .await?;
    info!("Job {} created by {}", job.id, identity.user_id);
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/jobs/:job_id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    identity: Identity,
    Json(draft): Json<JobDraft>,
) -> Result<Json<JobPosting>, AppError> {
    let existing = require_job(state.jobs.as_ref(), job_id).await?;
    if !identity.owns_or_admin(existing.created_by) {
        return Err(AppError::Forbidden(
            "Not authorized to update this job".to_string(),
        ));
    }
    let job = state
        .jobs
        .update(job_id, draft.normalized()?)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:job_id
///
/// Applications are deleted with the job; their resume files are removed best-effort.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    identity: Identity,
) -> Result<StatusCode, AppError> {
    let existing = require_job(state.jobs.as_ref(), job_id).await?;
    if !identity.owns_or_admin(existing.created_by) {
        return Err(AppError::Forbidden(
            "Not authorized to delete this job".to_string(),
        ));
    }

    let resume_paths = state
        .jobs
        .delete(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    for path in resume_paths {
        if let Err(e) = state.storage.remove(&path).await {
            warn!("Failed to remove resume {path} of deleted job {job_id}: {e}");
        }
    }
    info!("Job {job_id} deleted by {}", identity.user_id);
    Ok(StatusCode::NO_CONTENT)
}
