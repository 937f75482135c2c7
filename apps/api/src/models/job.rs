use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

text_enum!(JobType {
    FullTime => "Full-time",
    PartTime => "Part-time",
    Contract => "Contract",
    Internship => "Internship",
});

impl Default for JobType {
    fn default() -> Self {
        JobType::FullTime
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub min_experience: i32,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub location: String,
    pub job_type: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Ordered, never empty.
    pub skills: Vec<String>,
    pub min_experience: i32,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub location: String,
    pub job_type: JobType,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for JobPosting {
    type Error = AppError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(JobPosting {
            id: row.id,
            title: row.title,
            description: row.description,
            skills: row.skills,
            min_experience: row.min_experience,
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            location: row.location,
            job_type: row.job_type.parse::<JobType>().map_err(anyhow::Error::from)?,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

/// Client-supplied job fields for create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub min_experience: i32,
    #[serde(default)]
    pub salary_min: Option<i32>,
    #[serde(default)]
    pub salary_max: Option<i32>,
    pub location: String,
    #[serde(default)]
    pub job_type: JobType,
}

impl JobDraft {
    /// Trims text fields, drops blank skills, and rejects anything invalid.
    pub fn normalized(mut self) -> Result<Self, AppError> {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.location = self.location.trim().to_string();
        self.skills = self
            .skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if self.title.is_empty() {
            return Err(AppError::Validation("Please add a job title".into()));
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::Validation(format!(
                "Job title can not be more than {MAX_TITLE_CHARS} characters"
            )));
        }
        if self.description.is_empty() {
            return Err(AppError::Validation("Please add a description".into()));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(AppError::Validation(format!(
                "Description can not be more than {MAX_DESCRIPTION_CHARS} characters"
            )));
        }
        if self.skills.is_empty() {
            return Err(AppError::Validation("Please add at least one skill".into()));
        }
        if self.min_experience < 0 {
            return Err(AppError::Validation(
                "Minimum experience can not be negative".into(),
            ));
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(AppError::Validation(
                    "Salary minimum can not exceed maximum".into(),
                ));
            }
        }
        if self.location.is_empty() {
            return Err(AppError::Validation("Please add a location".into()));
        }
        Ok(self)
    }
}
