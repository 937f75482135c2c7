use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Identity;
use crate::interviews::{Interviews, ScheduleRequest};
use crate::models::interview::{Feedback, Interview};
use crate::state::AppState;

fn service(state: &AppState) -> Interviews<'_> {
    Interviews {
        interviews: state.interviews.as_ref(),
        candidates: state.candidates.as_ref(),
        jobs: state.jobs.as_ref(),
        notifier: state.notifier.as_ref(),
    }
}

/// GET /api/v1/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Interview>>, AppError> {
    Ok(Json(service(&state).list_for(&identity).await?))
}

/// POST /api/v1/interviews
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<Interview>), AppError> {
    let interview = service(&state).schedule(&identity, request).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

/// PUT /api/v1/interviews/:id/feedback
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    identity: Identity,
    Json(feedback): Json<Feedback>,
) -> Result<Json<Interview>, AppError> {
    Ok(Json(
        service(&state)
            .submit_feedback(&identity, id, feedback)
            .await?,
    ))
}
