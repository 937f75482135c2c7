//! Axum route handlers for resume preview and application.

use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::candidates::CandidateView;
use crate::errors::AppError;
use crate::identity::Identity;
use crate::intake::pipeline::Analysis;
use crate::models::candidate::ApplicantDetails;
use crate::state::AppState;
use crate::storage::TempUpload;

const RESUME_FIELD: &str = "resume";

/// Multipart fields accepted by the intake endpoints.
#[derive(Default)]
struct IntakeForm {
    details: ApplicantDetails,
    resume: Option<TempUpload>,
}

/// Streams the `resume` field to a staged file and collects text fields.
/// Unknown fields are skipped.
async fn read_intake_form(
    mut multipart: Multipart,
    staging_dir: &FsPath,
) -> Result<IntakeForm, AppError> {
    let mut form = IntakeForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            RESUME_FIELD => {
                if form.resume.is_some() {
                    return Err(AppError::Validation(
                        "Only one resume may be uploaded".to_string(),
                    ));
                }
                let mut writer =
                    TempUpload::writer(staging_dir, field.file_name().map(str::to_string))?;
                while let Some(chunk) = field.chunk().await? {
                    writer.write(&chunk).await?;
                }
                form.resume = Some(writer.finish().await?);
            }
            "name" => form.details.name = field.text().await?,
            "email" => form.details.email = field.text().await?,
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/v1/jobs/:job_id/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Analysis>, AppError> {
    let form = read_intake_form(multipart, &state.config.staging_dir()).await?;
    let analysis = state.pipeline.analyze(job_id, form.resume).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/jobs/:job_id/candidates
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    identity: Identity,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CandidateView>), AppError> {
    let form = read_intake_form(multipart, &state.config.staging_dir()).await?;
    let candidate = state
        .pipeline
        .apply(job_id, form.details, form.resume, &identity)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CandidateView::new(
            candidate,
            &state.config.resume_public_base,
        )),
    ))
}
