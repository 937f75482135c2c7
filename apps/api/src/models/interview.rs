use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

text_enum!(InterviewMode {
    Online => "Online",
    Offline => "Offline",
});

impl Default for InterviewMode {
    fn default() -> Self {
        InterviewMode::Online
    }
}

text_enum!(InterviewStatus {
    Scheduled => "Scheduled",
    Completed => "Completed",
    Cancelled => "Cancelled",
});

text_enum!(Decision {
    StrongYes => "Strong Yes",
    Yes => "Yes",
    No => "No",
    StrongNo => "Strong No",
    Pending => "Pending",
});

impl Default for Decision {
    fn default() -> Self {
        Decision::Pending
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub interviewer_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub mode: String,
    pub meeting_link: Option<String>,
    pub status: String,
    pub feedback_rating: Option<i16>,
    pub feedback_comments: Option<String>,
    pub feedback_decision: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: Option<u8>,
    pub comments: Option<String>,
    #[serde(default)]
    pub decision: Decision,
}

impl Feedback {
    pub fn normalized(self) -> Result<Self, AppError> {
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(AppError::Validation(
                    "Rating must be between 1 and 5".into(),
                ));
            }
        }
        Ok(Feedback {
            rating: self.rating,
            comments: self
                .comments
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            decision: self.decision,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interview {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub interviewer_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub mode: InterviewMode,
    /// Meeting link when online, location when offline.
    pub meeting_link: Option<String>,
    pub status: InterviewStatus,
    pub feedback: Option<Feedback>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<InterviewRow> for Interview {
    type Error = AppError;

    fn try_from(row: InterviewRow) -> Result<Self, Self::Error> {
        let feedback = match (row.feedback_rating, row.feedback_comments, row.feedback_decision) {
            (None, None, None) => None,
            (rating, comments, decision) => Some(Feedback {
                rating: rating.and_then(|r| u8::try_from(r).ok()),
                comments,
                decision: decision
                    .map(|d| d.parse::<Decision>())
                    .transpose()
                    .map_err(anyhow::Error::from)?
                    .unwrap_or_default(),
            }),
        };

        Ok(Interview {
            id: row.id,
            job_id: row.job_id,
            candidate_id: row.candidate_id,
            interviewer_id: row.interviewer_id,
            scheduled_at: row.scheduled_at,
            mode: row.mode.parse::<InterviewMode>().map_err(anyhow::Error::from)?,
            meeting_link: row.meeting_link,
            status: row
                .status
                .parse::<InterviewStatus>()
                .map_err(anyhow::Error::from)?,
            feedback,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewInterview {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub interviewer_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub mode: InterviewMode,
    pub meeting_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> InterviewRow {
        InterviewRow {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            interviewer_id: Uuid::new_v4(),
            scheduled_at: Utc::now(),
            mode: "Offline".into(),
            meeting_link: Some("Room 4".into()),
            status: "Scheduled".into(),
            feedback_rating: None,
            feedback_comments: None,
            feedback_decision: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_without_feedback() {
        let interview = Interview::try_from(row()).unwrap();
        assert_eq!(interview.mode, InterviewMode::Offline);
        assert_eq!(interview.status, InterviewStatus::Scheduled);
        assert!(interview.feedback.is_none());
    }

    #[test]
    fn test_row_with_feedback() {
        let mut r = row();
        r.status = "Completed".into();
        r.feedback_rating = Some(4);
        r.feedback_decision = Some("Strong Yes".into());
        let interview = Interview::try_from(r).unwrap();
        let feedback = interview.feedback.unwrap();
        assert_eq!(feedback.rating, Some(4));
        assert_eq!(feedback.decision, Decision::StrongYes);
    }

    #[test]
    fn test_unknown_status_is_internal_error() {
        let mut r = row();
        r.status = "Paused".into();
        assert!(matches!(
            Interview::try_from(r),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_feedback_rating_bounds() {
        let ok = Feedback {
            rating: Some(5),
            comments: Some("  solid  ".into()),
            decision: Decision::Yes,
        }
        .normalized()
        .unwrap();
        assert_eq!(ok.comments.as_deref(), Some("solid"));

        for bad in [0, 6] {
            let fb = Feedback {
                rating: Some(bad),
                comments: None,
                decision: Decision::No,
            };
            assert!(matches!(fb.normalized(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_decision_serde_names() {
        let d: Decision = serde_json::from_str(r#""Strong No""#).unwrap();
        assert_eq!(d, Decision::StrongNo);
        assert_eq!(serde_json::to_string(&Decision::StrongYes).unwrap(), r#""Strong Yes""#);
    }
}
