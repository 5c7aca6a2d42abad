use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::modules::{application::schema::ApplicationStatus, user::schema::UserRole};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleCount {
    pub role: UserRole,
    pub count: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsOverview {
    pub users_by_role: Vec<RoleCount>,
    pub total_companies: i64,
    pub total_recruitments: i64,
    pub open_recruitments: i64,
    pub applications_by_status: Vec<StatusCount>,
}
