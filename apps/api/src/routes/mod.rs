pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::candidates::handlers as candidates;
use crate::config::StorageBackend;
use crate::intake::handlers as intake;
use crate::interviews::handlers as interviews;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);
    let serve_local_resumes = matches!(state.config.storage, StorageBackend::Local);
    let resume_dir = state.config.resume_dir();

    let router = Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Intake
        .route("/api/v1/jobs/:job_id/analyze", post(intake::handle_analyze))
        .route(
            "/api/v1/jobs/:job_id/candidates",
            post(intake::handle_apply).get(candidates::handle_list_for_job),
        )
        // Candidates
        .route("/api/v1/candidates/mine", get(candidates::handle_list_mine))
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate).delete(candidates::handle_delete_candidate),
        )
        // Interviews
        .route(
            "/api/v1/interviews",
            get(interviews::handle_list_interviews).post(interviews::handle_schedule_interview),
        )
        .route(
            "/api/v1/interviews/:id/feedback",
            put(interviews::handle_submit_feedback),
        )
        .layer(body_limit)
        .with_state(state);

    if serve_local_resumes {
        router.nest_service("/uploads", ServeDir::new(resume_dir))
    } else {
        router
    }
}
