use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email pattern is valid")
});

text_enum!(CandidateStatus {
    Applied => "Applied",
    Shortlisted => "Shortlisted",
    Rejected => "Rejected",
    Hired => "Hired",
});

impl Default for CandidateStatus {
    fn default() -> Self {
        CandidateStatus::Applied
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub status: String,
    pub resume_path: String,
    pub match_score: i32,
    pub match_reason: Option<String>,
    pub ai_summary: Option<String>,
    pub added_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One application: a resume submitted by `added_by` against `job_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub status: CandidateStatus,
    /// Storage location; clients get `resume_url` instead.
    #[serde(skip_serializing)]
    pub resume_path: String,
    /// 0 until enrichment succeeds.
    pub match_score: i32,
    pub match_reason: Option<String>,
    pub ai_summary: Option<String>,
    pub added_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = AppError;

    fn try_from(row: CandidateRow) -> Result<Self, Self::Error> {
        Ok(Candidate {
            id: row.id,
            job_id: row.job_id,
            name: row.name,
            email: row.email,
            status: row
                .status
                .parse::<CandidateStatus>()
                .map_err(anyhow::Error::from)?,
            resume_path: row.resume_path,
            match_score: row.match_score,
            match_reason: row.match_reason,
            ai_summary: row.ai_summary,
            added_by: row.added_by,
            created_at: row.created_at,
        })
    }
}

/// Everything needed to insert a candidate; id and timestamp come from the store.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub resume_path: String,
    pub match_score: u8,
    pub match_reason: Option<String>,
    pub ai_summary: Option<String>,
    pub added_by: Uuid,
}

/// Applicant-entered form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantDetails {
    pub name: String,
    pub email: String,
}

impl ApplicantDetails {
    pub fn normalized(self) -> Result<Self, AppError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Please add a name".into()));
        }
        if email.is_empty() {
            return Err(AppError::Validation("Please add an email".into()));
        }
        if !is_valid_email(&email) {
            return Err(AppError::Validation("Please add a valid email".into()));
        }
        Ok(Self { name, email })
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
