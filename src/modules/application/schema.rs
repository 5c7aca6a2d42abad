use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};

/// PENDING is the only initial state; reviews move it to APPROVED or REJECTED.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn reviewed(is_approved: bool) -> Self {
        if is_approved {
            ApplicationStatus::Approved
        } else {
            ApplicationStatus::Rejected
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ApplicationEntity {
    pub id: i64,
    pub recruitment_id: i64,
    pub user_id: i64,
    pub cv_id: i64,
    pub message: String,
    pub status: ApplicationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Application joined with its applicant and CV metadata.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    #[sqlx(flatten)]
    pub application: ApplicationEntity,
    pub applicant_email: String,
    pub applicant_first_name: String,
    pub applicant_last_name: String,
    pub applicant_phone: Option<String>,
    pub applicant_avatar: Option<String>,
    pub cv_name: String,
    pub cv_size: i64,
    pub cv_content_type: String,
}
