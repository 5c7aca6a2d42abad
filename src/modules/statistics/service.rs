use std::sync::Arc;

use crate::{
    api::error,
    modules::{
        application::schema::ApplicationStatus,
        statistics::{
            repository::StatisticsRepository,
            schema::{RoleCount, StatisticsOverview, StatusCount},
        },
        user::schema::UserRole,
    },
};

const ROLES: [UserRole; 4] =
    [UserRole::Admin, UserRole::CompanyAdmin, UserRole::CompanyHr, UserRole::User];
const STATUSES: [ApplicationStatus; 3] =
    [ApplicationStatus::Pending, ApplicationStatus::Approved, ApplicationStatus::Rejected];

#[derive(Clone)]
pub struct StatisticsService<S>
where
    S: StatisticsRepository + Send + Sync,
{
    statistics_repo: Arc<S>,
}

impl<S> StatisticsService<S>
where
    S: StatisticsRepository + Send + Sync,
{
    pub fn with_dependencies(statistics_repo: Arc<S>) -> Self {
        StatisticsService { statistics_repo }
    }

    /// Dashboard figures, with every role and status listed even when zero.
    pub async fn overview(&self) -> Result<StatisticsOverview, error::SystemError> {
        let mut overview = self.statistics_repo.overview().await?;

        overview.users_by_role = ROLES
            .iter()
            .map(|role| RoleCount {
                role: *role,
                count: overview
                    .users_by_role
                    .iter()
                    .find(|c| c.role == *role)
                    .map_or(0, |c| c.count),
            })
            .collect();

        overview.applications_by_status = STATUSES
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: overview
                    .applications_by_status
                    .iter()
                    .find(|c| c.status == *status)
                    .map_or(0, |c| c.count),
            })
            .collect();

        Ok(overview)
    }
}
