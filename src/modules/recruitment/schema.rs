use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "job_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RecruitmentEntity {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub content: String,
    pub min_salary: i64,
    pub max_salary: i64,
    pub experience: i32,
    pub job_type: JobType,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl RecruitmentEntity {
    /// Applications are accepted up to and including the deadline instant.
    pub fn is_expired_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.deadline < now
    }
}
