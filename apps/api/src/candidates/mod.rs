// Candidate Store operations: reads with access checks, and deletion that
// also removes the resume artifact (best-effort). Creation happens only via
// the intake pipeline.

pub mod handlers;
pub mod store;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Identity;
use crate::jobs::JobStore;
use crate::models::candidate::Candidate;
use crate::models::job::{JobPosting, JobType};
use crate::storage::{resume_download_url, ResumeStorage};

pub use store::{CandidateStore, PgCandidateStore};

/// Candidate as returned to clients, with a download URL for the resume.
#[derive(Debug, Serialize)]
pub struct CandidateView {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub resume_url: Option<String>,
}

impl CandidateView {
    pub fn new(candidate: Candidate, public_base: &str) -> Self {
        let resume_url = resume_download_url(public_base, &candidate.resume_path);
        Self {
            candidate,
            resume_url,
        }
    }
}

/// The job summary shown next to an applicant's own application.
#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub job_type: JobType,
}

impl From<&JobPosting> for JobSummary {
    fn from(job: &JobPosting) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            location: job.location.clone(),
            job_type: job.job_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub candidate: CandidateView,
    pub job: Option<JobSummary>,
}

/// The applicant, the recruiter who owns the job, or an admin.
pub fn can_access(actor: &Identity, candidate: &Candidate, job_owner: Option<Uuid>) -> bool {
    actor.owns_or_admin(candidate.added_by) || job_owner == Some(actor.user_id)
}

async fn load_authorized(
    candidates: &dyn CandidateStore,
    jobs: &dyn JobStore,
    actor: &Identity,
    id: Uuid,
) -> Result<Candidate, AppError> {
    let candidate = candidates
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    let job_owner = jobs.get(candidate.job_id).await?.map(|j| j.created_by);
    if !can_access(actor, &candidate, job_owner) {
        return Err(AppError::Forbidden(
            "Not authorized to access this candidate".to_string(),
        ));
    }
    Ok(candidate)
}

pub async fn get_candidate(
    candidates: &dyn CandidateStore,
    jobs: &dyn JobStore,
    actor: &Identity,
    id: Uuid,
) -> Result<Candidate, AppError> {
    load_authorized(candidates, jobs, actor, id).await
}

/// All applications for a job; visible to the job's owner and admins.
pub async fn list_for_job(
    candidates: &dyn CandidateStore,
    jobs: &dyn JobStore,
    actor: &Identity,
    job_id: Uuid,
) -> Result<Vec<Candidate>, AppError> {
    let job = crate::jobs::require_job(jobs, job_id).await?;
    if !actor.owns_or_admin(job.created_by) {
        return Err(AppError::Forbidden(
            "Not authorized to view candidates for this job".to_string(),
        ));
    }
    candidates.list_by_job(job_id).await
}

/// Deletes the record, then removes the resume file. A missing or
/// undeletable file is logged and does not fail the operation.
pub async fn delete_candidate(
    candidates: &dyn CandidateStore,
    jobs: &dyn JobStore,
    storage: &dyn ResumeStorage,
    actor: &Identity,
    id: Uuid,
) -> Result<(), AppError> {
    let candidate = load_authorized(candidates, jobs, actor, id).await?;

    if !candidates.delete(id).await? {
        return Err(AppError::NotFound(format!("Candidate {id} not found")));
    }

    if let Err(e) = storage.remove(&candidate.resume_path).await {
        warn!(
            "Failed to delete resume file {} for candidate {id}: {e}",
            candidate.resume_path
        );
    }
    info!("Candidate {id} deleted by {}", actor.user_id);
    Ok(())
}
