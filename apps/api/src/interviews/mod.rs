// Interview scheduling and feedback. Scheduling emails the candidate; a
// failed email is logged and never fails the request.

pub mod handlers;
pub mod notify;
pub mod store;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::candidates::CandidateStore;
use crate::errors::AppError;
use crate::identity::{Identity, Role};
use crate::jobs::{require_job, JobStore};
use crate::models::interview::{Feedback, Interview, InterviewMode, NewInterview};

pub use notify::{interview_scheduled_email, LogNotifier, Notifier, SmtpNotifier};
pub use store::{InterviewStore, PgInterviewStore};

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    pub candidate_id: Uuid,
    /// Defaults to the candidate's job; must match it when given.
    pub job_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub mode: InterviewMode,
    pub meeting_link: Option<String>,
}

/// Borrowed collaborators for interview operations.
pub struct Interviews<'a> {
    pub interviews: &'a dyn InterviewStore,
    pub candidates: &'a dyn CandidateStore,
    pub jobs: &'a dyn JobStore,
    pub notifier: &'a dyn Notifier,
}

impl Interviews<'_> {
    pub async fn schedule(
        &self,
        actor: &Identity,
        request: ScheduleRequest,
    ) -> Result<Interview, AppError> {
        if !actor.can_recruit() {
            return Err(AppError::Forbidden(
                "Not authorized to schedule interviews".to_string(),
            ));
        }

        let candidate = self
            .candidates
            .get(request.candidate_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Candidate {} not found", request.candidate_id))
            })?;

        if let Some(job_id) = request.job_id {
            if job_id != candidate.job_id {
                return Err(AppError::Validation(
                    "Candidate did not apply to this job".to_string(),
                ));
            }
        }
        let job = require_job(self.jobs, candidate.job_id).await?;

        let interview = self
            .interviews
            .create(NewInterview {
                job_id: job.id,
                candidate_id: candidate.id,
                interviewer_id: actor.user_id,
                scheduled_at: request.scheduled_at,
                mode: request.mode,
                meeting_link: request
                    .meeting_link
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty()),
            })
            .await?;
        info!(
            "Interview {} scheduled for candidate {} by {}",
            interview.id, candidate.id, actor.user_id
        );

        let email =
            interview_scheduled_email(&candidate.name, &candidate.email, &job.title, &interview);
        if let Err(e) = self.notifier.send(email).await {
            error!("Failed to email candidate {} about interview {}: {e}", candidate.id, interview.id);
        }

        Ok(interview)
    }

    /// Admins see every interview, recruiters the ones they run, applicants
    /// the ones for their own applications.
    pub async fn list_for(&self, actor: &Identity) -> Result<Vec<Interview>, AppError> {
        match actor.role {
            Role::Admin => self.interviews.list_all().await,
            Role::Recruiter => self.interviews.list_by_interviewer(actor.user_id).await,
            Role::Applicant => {
                let ids: Vec<Uuid> = self
                    .candidates
                    .list_by_applicant(actor.user_id)
                    .await?
                    .into_iter()
                    .map(|c| c.id)
                    .collect();
                self.interviews.list_by_candidates(&ids).await
            }
        }
    }

    pub async fn submit_feedback(
        &self,
        actor: &Identity,
        id: Uuid,
        feedback: Feedback,
    ) -> Result<Interview, AppError> {
        let not_found = || AppError::NotFound(format!("Interview {id} not found"));

        let interview = self.interviews.get(id).await?.ok_or_else(not_found)?;
        if !actor.owns_or_admin(interview.interviewer_id) {
            return Err(AppError::Forbidden(
                "Not authorized to submit feedback".to_string(),
            ));
        }

        let feedback = feedback.normalized()?;
        self.interviews
            .record_feedback(id, feedback)
            .await?
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::{Decision, InterviewStatus};
    use crate::testing::{
        new_candidate, sample_job, InMemoryCandidates, InMemoryInterviews, InMemoryJobs,
        RecordingNotifier,
    };

    struct Fixture {
        interviews: InMemoryInterviews,
        candidates: InMemoryCandidates,
        jobs: InMemoryJobs,
        notifier: RecordingNotifier,
        recruiter: Identity,
        applicant: Identity,
        candidate_id: Uuid,
        job_id: Uuid,
    }

    impl Fixture {
        async fn new(notifier: RecordingNotifier) -> Self {
            let recruiter = Identity {
                user_id: Uuid::new_v4(),
                role: Role::Recruiter,
            };
            let applicant = Identity {
                user_id: Uuid::new_v4(),
                role: Role::Applicant,
            };
            let jobs = InMemoryJobs::default();
            let job = jobs.insert(sample_job(recruiter.user_id));
            let candidates = InMemoryCandidates::default();
            let candidate = candidates
                .create(new_candidate(job.id, applicant.user_id, "uploads/resumes/a.pdf"))
                .await
                .unwrap();

            Fixture {
                interviews: InMemoryInterviews::default(),
                candidates,
                jobs,
                notifier,
                recruiter,
                applicant,
                candidate_id: candidate.id,
                job_id: job.id,
            }
        }

        fn service(&self) -> Interviews<'_> {
            Interviews {
                interviews: &self.interviews,
                candidates: &self.candidates,
                jobs: &self.jobs,
                notifier: &self.notifier,
            }
        }

        fn request(&self) -> ScheduleRequest {
            ScheduleRequest {
                candidate_id: self.candidate_id,
                job_id: Some(self.job_id),
                scheduled_at: Utc::now(),
                mode: InterviewMode::Online,
                meeting_link: Some("https://meet.example.com/abc".into()),
            }
        }
    }

    #[tokio::test]
    async fn test_schedule_persists_and_emails_candidate() {
        let fx = Fixture::new(RecordingNotifier::default()).await;
        let interview = fx.service().schedule(&fx.recruiter, fx.request()).await.unwrap();

        assert_eq!(interview.status, InterviewStatus::Scheduled);
        assert_eq!(interview.interviewer_id, fx.recruiter.user_id);
        let sent = fx.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_schedule_succeeds_when_email_fails() {
        let fx = Fixture::new(RecordingNotifier::failing()).await;
        let interview = fx.service().schedule(&fx.recruiter, fx.request()).await;
        assert!(interview.is_ok());
        assert_eq!(fx.interviews.count(), 1);
    }

    #[tokio::test]
    async fn test_applicant_cannot_schedule() {
        let fx = Fixture::new(RecordingNotifier::default()).await;
        let result = fx.service().schedule(&fx.applicant, fx.request()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(fx.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_schedule_unknown_candidate_is_not_found() {
        let fx = Fixture::new(RecordingNotifier::default()).await;
        let mut request = fx.request();
        request.candidate_id = Uuid::new_v4();
        let result = fx.service().schedule(&fx.recruiter, request).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_schedule_rejects_mismatched_job() {
        let fx = Fixture::new(RecordingNotifier::default()).await;
        let mut request = fx.request();
        request.job_id = Some(Uuid::new_v4());
        let result = fx.service().schedule(&fx.recruiter, request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_feedback_completes_interview() {
        let fx = Fixture::new(RecordingNotifier::default()).await;
        let interview = fx.service().schedule(&fx.recruiter, fx.request()).await.unwrap();

        let updated = fx
            .service()
            .submit_feedback(
                &fx.recruiter,
                interview.id,
                Feedback {
                    rating: Some(4),
                    comments: Some("Good".into()),
                    decision: Decision::Yes,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, InterviewStatus::Completed);
        assert_eq!(updated.feedback.unwrap().rating, Some(4));
    }

    #[tokio::test]
    async fn test_feedback_only_from_interviewer_or_admin() {
        let fx = Fixture::new(RecordingNotifier::default()).await;
        let interview = fx.service().schedule(&fx.recruiter, fx.request()).await.unwrap();
        let feedback = Feedback {
            rating: Some(3),
            comments: None,
            decision: Decision::Pending,
        };

        let other = Identity {
            user_id: Uuid::new_v4(),
            role: Role::Recruiter,
        };
        let denied = fx
            .service()
            .submit_feedback(&other, interview.id, feedback.clone())
            .await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        let admin = Identity {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(fx
            .service()
            .submit_feedback(&admin, interview.id, feedback)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_feedback_rating_out_of_range() {
        let fx = Fixture::new(RecordingNotifier::default()).await;
        let interview = fx.service().schedule(&fx.recruiter, fx.request()).await.unwrap();
        let result = fx
            .service()
            .submit_feedback(
                &fx.recruiter,
                interview.id,
                Feedback {
                    rating: Some(9),
                    comments: None,
                    decision: Decision::No,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_listing_by_role() {
        let fx = Fixture::new(RecordingNotifier::default()).await;
        fx.service().schedule(&fx.recruiter, fx.request()).await.unwrap();

        assert_eq!(fx.service().list_for(&fx.recruiter).await.unwrap().len(), 1);
        assert_eq!(fx.service().list_for(&fx.applicant).await.unwrap().len(), 1);

        let stranger = Identity {
            user_id: Uuid::new_v4(),
            role: Role::Applicant,
        };
        assert!(fx.service().list_for(&stranger).await.unwrap().is_empty());
    }
}
