//! In-memory fakes for the store, extractor and notifier seams.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::candidates::CandidateStore;
use crate::config::{AiConfig, AiMode, Config, StorageBackend};
use crate::errors::AppError;
use crate::intake::extractor::{DocumentParseError, TextExtractor};
use crate::intake::{Enricher, IntakePipeline};
use crate::interviews::notify::{EmailMessage, NotifyError};
use crate::interviews::{InterviewStore, Notifier};
use crate::jobs::JobStore;
use crate::matching::AiBackend;
use crate::models::candidate::{Candidate, CandidateStatus, NewCandidate};
use crate::models::interview::{Feedback, Interview, InterviewStatus, NewInterview};
use crate::models::job::{JobDraft, JobPosting, JobType};
use crate::state::AppState;
use crate::storage::LocalResumeStorage;

pub fn sample_job(created_by: Uuid) -> JobPosting {
    JobPosting {
        id: Uuid::new_v4(),
        title: "Full Stack Developer".into(),
        description: "Build product features across a React frontend and Node services.".into(),
        skills: vec!["React".into(), "Node".into()],
        min_experience: 2,
        salary_min: Some(60_000),
        salary_max: Some(90_000),
        location: "Remote".into(),
        job_type: JobType::FullTime,
        created_by,
        created_at: Utc::now(),
    }
}

pub fn new_candidate(job_id: Uuid, added_by: Uuid, resume_path: &str) -> NewCandidate {
    NewCandidate {
        job_id,
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        resume_path: resume_path.into(),
        match_score: 80,
        match_reason: Some("Good fit".into()),
        ai_summary: Some("Experienced developer.".into()),
        added_by,
    }
}

pub fn candidate_at(resume_path: &str) -> Candidate {
    materialize(new_candidate(Uuid::new_v4(), Uuid::new_v4(), resume_path))
}

fn materialize(c: NewCandidate) -> Candidate {
    Candidate {
        id: Uuid::new_v4(),
        job_id: c.job_id,
        name: c.name,
        email: c.email,
        status: CandidateStatus::default(),
        resume_path: c.resume_path,
        match_score: i32::from(c.match_score),
        match_reason: c.match_reason,
        ai_summary: c.ai_summary,
        added_by: c.added_by,
        created_at: Utc::now(),
    }
}

// ── Stores ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryJobs {
    jobs: Mutex<Vec<JobPosting>>,
    applications: Option<Arc<InMemoryCandidates>>,
}

impl InMemoryJobs {
    /// Deleting a job also deletes its candidates from `applications`.
    pub fn cascading_to(applications: Arc<InMemoryCandidates>) -> Self {
        Self {
            jobs: Mutex::default(),
            applications: Some(applications),
        }
    }

    pub fn insert(&self, job: JobPosting) -> JobPosting {
        self.jobs.lock().unwrap().push(job.clone());
        job
    }
}

#[async_trait]
impl JobStore for InMemoryJobs {
    async fn get(&self, id: Uuid) -> Result<Option<JobPosting>, AppError> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<JobPosting>, AppError> {
        Ok(self.jobs.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn create(&self, created_by: Uuid, draft: JobDraft) -> Result<JobPosting, AppError> {
        let job = JobPosting {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            skills: draft.skills,
            min_experience: draft.min_experience,
            salary_min: draft.salary_min,
            salary_max: draft.salary_max,
            location: draft.location,
            job_type: draft.job_type,
            created_by,
            created_at: Utc::now(),
        };
        Ok(self.insert(job))
    }

    async fn update(&self, id: Uuid, draft: JobDraft) -> Result<Option<JobPosting>, AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        job.title = draft.title;
        job.description = draft.description;
        job.skills = draft.skills;
        job.min_experience = draft.min_experience;
        job.salary_min = draft.salary_min;
        job.salary_max = draft.salary_max;
        job.location = draft.location;
        job.job_type = draft.job_type;
        Ok(Some(job.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Vec<String>>, AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        if jobs.len() == before {
            return Ok(None);
        }
        Ok(Some(
            self.applications
                .as_ref()
                .map(|c| c.remove_for_job(id))
                .unwrap_or_default(),
        ))
    }
}

#[derive(Default)]
pub struct InMemoryCandidates {
    candidates: Mutex<Vec<Candidate>>,
    fail_next: AtomicBool,
}

impl InMemoryCandidates {
    pub fn count(&self) -> usize {
        self.candidates.lock().unwrap().len()
    }

    fn remove_for_job(&self, job_id: Uuid) -> Vec<String> {
        let mut candidates = self.candidates.lock().unwrap();
        let (removed, kept): (Vec<Candidate>, Vec<Candidate>) =
            candidates.drain(..).partition(|c| c.job_id == job_id);
        *candidates = kept;
        removed.into_iter().map(|c| c.resume_path).collect()
    }

    /// Makes the next `create` fail like a lost database connection.
    pub fn fail_next_create(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CandidateStore for InMemoryCandidates {
    async fn create(&self, candidate: NewCandidate) -> Result<Candidate, AppError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        let candidate = materialize(candidate);
        self.candidates.lock().unwrap().push(candidate.clone());
        Ok(candidate)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Candidate>, AppError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<Candidate>, AppError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn list_by_applicant(&self, user_id: Uuid) -> Result<Vec<Candidate>, AppError> {
        let mut mine: Vec<Candidate> = self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| c.added_by == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut candidates = self.candidates.lock().unwrap();
        let before = candidates.len();
        candidates.retain(|c| c.id != id);
        Ok(candidates.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryInterviews {
    interviews: Mutex<Vec<Interview>>,
}

impl InMemoryInterviews {
    pub fn count(&self) -> usize {
        self.interviews.lock().unwrap().len()
    }

    fn filtered(&self, keep: impl Fn(&Interview) -> bool) -> Vec<Interview> {
        self.interviews
            .lock()
            .unwrap()
            .iter()
            .filter(|i| keep(i))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl InterviewStore for InMemoryInterviews {
    async fn create(&self, new: NewInterview) -> Result<Interview, AppError> {
        let interview = Interview {
            id: Uuid::new_v4(),
            job_id: new.job_id,
            candidate_id: new.candidate_id,
            interviewer_id: new.interviewer_id,
            scheduled_at: new.scheduled_at,
            mode: new.mode,
            meeting_link: new.meeting_link,
            status: InterviewStatus::Scheduled,
            feedback: None,
            created_at: Utc::now(),
        };
        self.interviews.lock().unwrap().push(interview.clone());
        Ok(interview)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Interview>, AppError> {
        Ok(self.filtered(|i| i.id == id).into_iter().next())
    }

    async fn list_all(&self) -> Result<Vec<Interview>, AppError> {
        Ok(self.filtered(|_| true))
    }

    async fn list_by_interviewer(&self, interviewer_id: Uuid) -> Result<Vec<Interview>, AppError> {
        Ok(self.filtered(|i| i.interviewer_id == interviewer_id))
    }

    async fn list_by_candidates(&self, candidate_ids: &[Uuid]) -> Result<Vec<Interview>, AppError> {
        Ok(self.filtered(|i| candidate_ids.contains(&i.candidate_id)))
    }

    async fn record_feedback(
        &self,
        id: Uuid,
        feedback: Feedback,
    ) -> Result<Option<Interview>, AppError> {
        let mut interviews = self.interviews.lock().unwrap();
        let Some(interview) = interviews.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        interview.feedback = Some(feedback);
        interview.status = InterviewStatus::Completed;
        Ok(Some(interview.clone()))
    }
}

// ── Collaborators ───────────────────────────────────────────────────────────

/// Treats the document bytes as UTF-8 text. Documents starting with
/// "corrupt" fail to parse.
pub struct Utf8Extractor;

#[async_trait]
impl TextExtractor for Utf8Extractor {
    async fn extract(&self, document: Bytes) -> Result<String, DocumentParseError> {
        if document.starts_with(b"corrupt") {
            return Err(DocumentParseError::Pdf("corrupt test document".into()));
        }
        String::from_utf8(document.to_vec()).map_err(|e| DocumentParseError::Pdf(e.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        if self.fail {
            let bad: Result<lettre::Address, _> = "not an address".parse();
            return Err(NotifyError::Address(bad.unwrap_err()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// ── Application ─────────────────────────────────────────────────────────────

/// Router-level fixture: offline AI, local storage under a temp dir.
pub struct TestApp {
    pub state: AppState,
    pub jobs: Arc<InMemoryJobs>,
    pub candidates: Arc<InMemoryCandidates>,
    _upload_dir: tempfile::TempDir,
}

pub fn test_app() -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let config = Config {
        database_url: "postgres://unused".into(),
        port: 0,
        rust_log: "debug".into(),
        ai: AiConfig {
            mode: AiMode::Offline,
            timeout: Duration::from_secs(5),
            breaker_threshold: 5,
            breaker_cooldown: Duration::from_secs(30),
        },
        upload_dir: upload_dir.path().to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        resume_public_base: "/uploads".into(),
        storage: StorageBackend::Local,
        smtp: None,
    };
    std::fs::create_dir_all(config.staging_dir()).unwrap();
    std::fs::create_dir_all(config.resume_dir()).unwrap();

    let candidates = Arc::new(InMemoryCandidates::default());
    let jobs = Arc::new(InMemoryJobs::cascading_to(candidates.clone()));
    let storage = Arc::new(LocalResumeStorage::new(config.resume_dir()));
    let pipeline = IntakePipeline::new(
        jobs.clone(),
        candidates.clone(),
        storage.clone(),
        Enricher::new(Arc::new(Utf8Extractor), AiBackend::Offline),
    );

    let state = AppState {
        config,
        jobs: jobs.clone(),
        candidates: candidates.clone(),
        interviews: Arc::new(InMemoryInterviews::default()),
        storage,
        pipeline: Arc::new(pipeline),
        notifier: Arc::new(RecordingNotifier::default()),
    };

    TestApp {
        state,
        jobs,
        candidates,
        _upload_dir: upload_dir,
    }
}
