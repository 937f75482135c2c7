use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::candidates::{self, ApplicationView, CandidateView, JobSummary};
use crate::errors::AppError;
use crate::identity::Identity;
use crate::state::AppState;

/// GET /api/v1/jobs/:job_id/candidates
pub async fn handle_list_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    identity: Identity,
) -> Result<Json<Vec<CandidateView>>, AppError> {
    let list = candidates::list_for_job(
        state.candidates.as_ref(),
        state.jobs.as_ref(),
        &identity,
        job_id,
    )
    .await?;
    let base = &state.config.resume_public_base;
    Ok(Json(
        list.into_iter()
            .map(|c| CandidateView::new(c, base))
            .collect(),
    ))
}

/// GET /api/v1/candidates/mine
pub async fn handle_list_mine(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<ApplicationView>>, AppError> {
    let mine = state.candidates.list_by_applicant(identity.user_id).await?;
    let base = &state.config.resume_public_base;

    let mut views = Vec::with_capacity(mine.len());
    for candidate in mine {
        let job = state.jobs.get(candidate.job_id).await?;
        views.push(ApplicationView {
            job: job.as_ref().map(JobSummary::from),
            candidate: CandidateView::new(candidate, base),
        });
    }
    Ok(Json(views))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    identity: Identity,
) -> Result<Json<CandidateView>, AppError> {
    let candidate =
        candidates::get_candidate(state.candidates.as_ref(), state.jobs.as_ref(), &identity, id)
            .await?;
    Ok(Json(CandidateView::new(
        candidate,
        &state.config.resume_public_base,
    )))
}

/// DELETE /api/v1/candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    identity: Identity,
) -> Result<StatusCode, AppError> {
    candidates::delete_candidate(
        state.candidates.as_ref(),
        state.jobs.as_ref(),
        state.storage.as_ref(),
        &identity,
        id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
