use crate::{
    api::{error, pagination::begin_snapshot},
    modules::statistics::{
        repository::StatisticsRepository,
        schema::{RoleCount, StatisticsOverview, StatusCount},
    },
};

#[derive(Clone)]
pub struct StatisticsRepositoryPg {
    pool: sqlx::PgPool,
}

impl StatisticsRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StatisticsRepository for StatisticsRepositoryPg {
    async fn overview(&self) -> Result<StatisticsOverview, error::SystemError> {
        let mut tx = begin_snapshot(&self.pool).await?;

        let users_by_role = sqlx::query_as::<_, RoleCount>(
            "SELECT role, COUNT(*) AS count FROM users GROUP BY role",
        )
        .fetch_all(&mut *tx)
        .await?;

        let total_companies = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
            .fetch_one(&mut *tx)
            .await?;

        let (total_recruitments, open_recruitments) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE deadline >= NOW())
            FROM recruitments
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let applications_by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM applications GROUP BY status",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(StatisticsOverview {
            users_by_role,
            total_companies,
            total_recruitments,
            open_recruitments,
            applications_by_status,
        })
    }
}
