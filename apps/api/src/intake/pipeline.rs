//! Intake Pipeline: preview (`analyze`) and apply (`apply`) share one
//! enrichment routine and differ only in persistence and failure policy.
//!
//! # Failure policy
//! - Preview: a document that cannot be read fails the request with
//!   `AnalysisFailed`. There is no record to fall back to.
//! - Apply: the same failure is logged and the candidate is still created
//!   with `match_score = 0` and no summary. An application is never lost to
//!   an enrichment problem.
//!
//! Remote AI failures never reach either path; the scorer and summarizer
//! return `RemoteResult::Degraded` with fallback values instead.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::candidates::CandidateStore;
use crate::errors::AppError;
use crate::identity::Identity;
use crate::intake::extractor::{DocumentParseError, TextExtractor};
use crate::jobs::{require_job, JobStore};
use crate::matching::{AiBackend, FitScorer, ResumeSummarizer, ScoreResult};
use crate::models::candidate::{ApplicantDetails, Candidate, NewCandidate};
use crate::models::job::JobPosting;
use crate::storage::{ResumeStorage, TempUpload};

/// AI fields derived from one resume against one job.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub score: ScoreResult,
    pub summary: String,
    pub score_degraded: bool,
    pub summary_degraded: bool,
}

impl Enrichment {
    pub fn is_degraded(&self) -> bool {
        self.score_degraded || self.summary_degraded
    }
}

/// Preview response.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub score: u8,
    pub reason: String,
    pub feedback: String,
    /// Advisory: `score > MATCH_THRESHOLD`. Apply does not enforce it.
    pub qualifies: bool,
    /// True when any part came from a fallback rather than the remote model.
    pub degraded: bool,
}

impl From<Enrichment> for Analysis {
    fn from(e: Enrichment) -> Self {
        Analysis {
            qualifies: e.score.qualifies(),
            degraded: e.is_degraded(),
            score: e.score.score,
            reason: e.score.reason,
            feedback: e.summary,
        }
    }
}

/// Extraction followed by scoring and summarization.
#[derive(Clone)]
pub struct Enricher {
    extractor: Arc<dyn TextExtractor>,
    scorer: FitScorer,
    summarizer: ResumeSummarizer,
}

impl Enricher {
    pub fn new(extractor: Arc<dyn TextExtractor>, backend: AiBackend) -> Self {
        Self {
            extractor,
            scorer: FitScorer::new(backend.clone()),
            summarizer: ResumeSummarizer::new(backend),
        }
    }

    /// The single enrichment routine behind both preview and apply.
    pub async fn run_enrichment(
        &self,
        document: Bytes,
        job: &JobPosting,
    ) -> Result<Enrichment, DocumentParseError> {
        let text = self.extractor.extract(document).await?;
        Ok(self.enrich_text(&text, job).await)
    }

    async fn enrich_text(&self, resume_text: &str, job: &JobPosting) -> Enrichment {
        // Independent calls; both settle before the result is built.
        let (score, summary) = tokio::join!(
            self.scorer.score(resume_text, &job.description, &job.skills),
            self.summarizer.summarize(resume_text),
        );

        Enrichment {
            score_degraded: score.is_degraded(),
            summary_degraded: summary.is_degraded(),
            score: score.into_value(),
            summary: summary.into_value(),
        }
    }
}

pub struct IntakePipeline {
    jobs: Arc<dyn JobStore>,
    candidates: Arc<dyn CandidateStore>,
    storage: Arc<dyn ResumeStorage>,
    enricher: Enricher,
}

impl IntakePipeline {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        candidates: Arc<dyn CandidateStore>,
        storage: Arc<dyn ResumeStorage>,
        enricher: Enricher,
    ) -> Self {
        Self {
            jobs,
            candidates,
            storage,
            enricher,
        }
    }

    /// Scores a resume against a job without recording anything.
    /// The staged upload is gone by the time this returns, whatever the outcome.
    pub async fn analyze(
        &self,
        job_id: Uuid,
        upload: Option<TempUpload>,
    ) -> Result<Analysis, AppError> {
        let job = require_job(self.jobs.as_ref(), job_id).await?;
        let upload = require_upload(upload)?;

        let document = upload.read().await;
        upload.discard();
        let document = document?;

        let enrichment = self
            .enricher
            .run_enrichment(document, &job)
            .await
            .map_err(|e| {
                warn!("Preview analysis for job {job_id} failed: {e}");
                AppError::AnalysisFailed(e.to_string())
            })?;

        info!(
            "Previewed resume for job {job_id}: score {} (degraded: {})",
            enrichment.score.score,
            enrichment.is_degraded()
        );
        Ok(enrichment.into())
    }

    /// Stores the resume, enriches it, and creates the candidate record.
    pub async fn apply(
        &self,
        job_id: Uuid,
        details: ApplicantDetails,
        upload: Option<TempUpload>,
        applicant: &Identity,
    ) -> Result<Candidate, AppError> {
        let job = require_job(self.jobs.as_ref(), job_id).await?;
        let upload = require_upload(upload)?;
        let details = details.normalized()?;

        let document = upload.read().await?;
        let resume_path = self.storage.store(upload).await?;

        let (match_score, match_reason, ai_summary) =
            match self.enricher.run_enrichment(document, &job).await {
                Ok(e) => (e.score.score, Some(e.score.reason), Some(e.summary)),
                Err(e) => {
                    warn!("Enrichment skipped for application to job {job_id}: {e}");
                    (0, None, None)
                }
            };

        let new_candidate = NewCandidate {
            job_id,
            name: details.name,
            email: details.email,
            resume_path: resume_path.clone(),
            match_score,
            match_reason,
            ai_summary,
            added_by: applicant.user_id,
        };

        match self.candidates.create(new_candidate).await {
            Ok(candidate) => {
                info!(
                    "Candidate {} applied to job {job_id} with score {}",
                    candidate.id, candidate.match_score
                );
                Ok(candidate)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&resume_path).await {
                    warn!("Failed to remove orphaned resume {resume_path}: {cleanup}");
                }
                Err(e)
            }
        }
    }
}

fn require_upload(upload: Option<TempUpload>) -> Result<TempUpload, AppError> {
    upload
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::MissingInput("Please upload a resume".to_string()))
}
