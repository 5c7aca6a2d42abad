use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::pagination::{Sort, SortDirection};
use crate::modules::application::schema::{ApplicationEntity, ApplicationRow, ApplicationStatus};

pub const APPLICATION_SORT_FIELDS: &[(&str, &str)] = &[
    ("id", "id"),
    ("status", "status"),
    ("created_at", "created_at"),
    ("updated_at", "updated_at"),
];

pub const DEFAULT_APPLICATION_SORT: Sort =
    Sort { column: "created_at", direction: SortDirection::Desc };

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApplicationModel {
    #[validate(range(min = 1, message = "Invalid recruitment id"))]
    pub recruitment_id: i64,
    #[validate(range(min = 1, message = "Invalid CV id"))]
    pub cv_id: i64,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Message must be at most 5000 characters long"))]
    pub message: String,
}

/// Content edit used by trusted administrators; every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateApplicationModel {
    #[validate(length(max = 5000, message = "Message must be at most 5000 characters long"))]
    pub message: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub cv_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ApplicationQuery {
    pub user_id: Option<i64>,
    pub recruitment_id: Option<i64>,
    pub status: Option<ApplicationStatus>,
    #[validate(range(min = 0, message = "Offset cannot be negative"))]
    pub offset: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub recruitment_id: i64,
    pub user_id: i64,
    pub cv_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateApplication {
    pub message: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub cv_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub user_id: Option<i64>,
    pub recruitment_id: Option<i64>,
    pub status: Option<ApplicationStatus>,
}

/// Single application with a signed CV download link.
#[derive(Debug, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: ApplicationEntity,
    pub cv_url: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicantSummary {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CvMetadata {
    pub id: i64,
    pub name: String,
    pub size: i64,
    pub content_type: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationListItem {
    #[serde(flatten)]
    pub application: ApplicationEntity,
    pub applicant: ApplicantSummary,
    pub cv: CvMetadata,
}

impl From<ApplicationRow> for ApplicationListItem {
    fn from(row: ApplicationRow) -> Self {
        let applicant = ApplicantSummary {
            id: row.application.user_id,
            full_name: format!("{} {}", row.applicant_first_name, row.applicant_last_name),
            email: row.applicant_email,
            first_name: row.applicant_first_name,
            last_name: row.applicant_last_name,
            phone: row.applicant_phone,
            avatar: row.applicant_avatar,
        };
        let cv = CvMetadata {
            id: row.application.cv_id,
            name: row.cv_name,
            size: row.cv_size,
            content_type: row.cv_content_type,
        };

        Self { application: row.application, applicant, cv }
    }
}
