use serde::Deserialize;
use validator::Validate;

use crate::api::{
    error,
    pagination::{Sort, SortDirection},
};
use crate::modules::recruitment::schema::{JobType, RecruitmentEntity};

pub const RECRUITMENT_SORT_FIELDS: &[(&str, &str)] = &[
    ("id", "id"),
    ("title", "title"),
    ("deadline", "deadline"),
    ("min_salary", "min_salary"),
    ("max_salary", "max_salary"),
    ("created_at", "created_at"),
];

pub const DEFAULT_RECRUITMENT_SORT: Sort =
    Sort { column: "created_at", direction: SortDirection::Desc };

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecruitmentModel {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters long"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
    pub min_salary: i64,
    pub max_salary: i64,
    pub experience: i32,
    pub job_type: JobType,
    pub deadline: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRecruitmentModel {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters long"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub experience: Option<i32>,
    pub job_type: Option<JobType>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
}

impl UpdateRecruitmentModel {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.min_salary.is_none()
            && self.max_salary.is_none()
            && self.experience.is_none()
            && self.job_type.is_none()
            && self.deadline.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecruitmentQuery {
    pub company_id: Option<i64>,
    pub job_type: Option<JobType>,
    pub search: Option<String>,
    pub open_only: Option<bool>,
    #[validate(range(min = 0, message = "Offset cannot be negative"))]
    pub offset: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

/// Complete set of editable columns, written as a whole on insert and update.
#[derive(Debug, Clone, PartialEq)]
pub struct RecruitmentValues {
    pub title: String,
    pub content: String,
    pub min_salary: i64,
    pub max_salary: i64,
    pub experience: i32,
    pub job_type: JobType,
    pub deadline: chrono::DateTime<chrono::Utc>,
}

impl RecruitmentValues {
    pub fn check(&self) -> Result<(), error::SystemError> {
        if self.min_salary < 0 {
            return Err(error::SystemError::bad_request("Minimum salary cannot be negative"));
        }
        if self.min_salary > self.max_salary {
            return Err(error::SystemError::bad_request(
                "Minimum salary cannot exceed maximum salary",
            ));
        }
        if self.experience < 0 {
            return Err(error::SystemError::bad_request("Experience cannot be negative"));
        }
        Ok(())
    }

    pub fn merge(current: &RecruitmentEntity, patch: UpdateRecruitmentModel) -> Self {
        Self {
            title: patch.title.unwrap_or_else(|| current.title.clone()),
            content: patch.content.unwrap_or_else(|| current.content.clone()),
            min_salary: patch.min_salary.unwrap_or(current.min_salary),
            max_salary: patch.max_salary.unwrap_or(current.max_salary),
            experience: patch.experience.unwrap_or(current.experience),
            job_type: patch.job_type.unwrap_or(current.job_type),
            deadline: patch.deadline.unwrap_or(current.deadline),
        }
    }
}

impl From<CreateRecruitmentModel> for RecruitmentValues {
    fn from(data: CreateRecruitmentModel) -> Self {
        Self {
            title: data.title,
            content: data.content,
            min_salary: data.min_salary,
            max_salary: data.max_salary,
            experience: data.experience,
            job_type: data.job_type,
            deadline: data.deadline,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecruitmentFilter {
    pub company_id: Option<i64>,
    pub job_type: Option<JobType>,
    pub search: Option<String>,
    pub open_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> RecruitmentValues {
        RecruitmentValues {
            title: "Backend Engineer".into(),
            content: "Rust and Postgres".into(),
            min_salary: 1000,
            max_salary: 2000,
            experience: 2,
            job_type: JobType::FullTime,
            deadline: chrono::Utc::now(),
        }
    }

    #[test]
    fn salary_and_experience_rules() {
        assert!(values().check().is_ok());
        assert!(RecruitmentValues { max_salary: 1000, ..values() }.check().is_ok());
        assert!(RecruitmentValues { min_salary: 3000, ..values() }.check().is_err());
        assert!(RecruitmentValues { min_salary: -1, ..values() }.check().is_err());
        assert!(RecruitmentValues { experience: -1, ..values() }.check().is_err());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateRecruitmentModel::default().is_empty());
        assert!(!UpdateRecruitmentModel { experience: Some(0), ..Default::default() }.is_empty());
    }
}
