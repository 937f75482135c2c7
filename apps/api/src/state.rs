use std::sync::Arc;

use crate::candidates::CandidateStore;
use crate::config::Config;
use crate::intake::IntakePipeline;
use crate::interviews::{InterviewStore, Notifier};
use crate::jobs::JobStore;
use crate::storage::ResumeStorage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub jobs: Arc<dyn JobStore>,
    pub candidates: Arc<dyn CandidateStore>,
    pub interviews: Arc<dyn InterviewStore>,
    /// Local directory or S3 bucket, chosen from `S3_BUCKET` at startup.
    pub storage: Arc<dyn ResumeStorage>,
    pub pipeline: Arc<IntakePipeline>,
    /// SMTP when configured, otherwise log-only.
    pub notifier: Arc<dyn Notifier>,
}
