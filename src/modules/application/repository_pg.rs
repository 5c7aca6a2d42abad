use crate::{
    api::{
        error,
        pagination::{begin_snapshot, PageRequest},
    },
    modules::application::{
        model::{ApplicationFilter, NewApplication, UpdateApplication},
        repository::ApplicationRepository,
        schema::{ApplicationEntity, ApplicationRow, ApplicationStatus},
    },
};

const FILTER_SQL: &str = r#"
    ($1::bigint IS NULL OR user_id = $1)
    AND ($2::bigint IS NULL OR recruitment_id = $2)
    AND ($3::application_status IS NULL OR status = $3)
"#;

#[derive(Clone)]
pub struct ApplicationRepositoryPg {
    pool: sqlx::PgPool,
}

impl ApplicationRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ApplicationRepository for ApplicationRepositoryPg {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApplicationEntity>, error::SystemError> {
        let application =
            sqlx::query_as::<_, ApplicationEntity>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(application)
    }

    async fn find_by_recruitment_and_user(
        &self,
        recruitment_id: i64,
        user_id: i64,
    ) -> Result<Option<ApplicationEntity>, error::SystemError> {
        let application = sqlx::query_as::<_, ApplicationEntity>(
            "SELECT * FROM applications WHERE recruitment_id = $1 AND user_id = $2",
        )
        .bind(recruitment_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn find_by_recruitment(
        &self,
        recruitment_id: i64,
    ) -> Result<Vec<ApplicationRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT
                a.*,
                u.email        AS applicant_email,
                u.first_name   AS applicant_first_name,
                u.last_name    AS applicant_last_name,
                u.phone        AS applicant_phone,
                u.avatar       AS applicant_avatar,
                f.name         AS cv_name,
                f.size         AS cv_size,
                f.content_type AS cv_content_type
            FROM applications a
            JOIN users u ON u.id = a.user_id
            JOIN files f ON f.id = a.cv_id
            WHERE a.recruitment_id = $1
            ORDER BY a.created_at DESC, a.id DESC
            "#,
        )
        .bind(recruitment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_page(
        &self,
        filter: &ApplicationFilter,
        page: &PageRequest,
    ) -> Result<(Vec<ApplicationEntity>, i64), error::SystemError> {
        let query_sql = format!(
            "SELECT * FROM applications WHERE {FILTER_SQL} ORDER BY {order}, id DESC LIMIT $4 OFFSET $5",
            order = page.sort.to_sql(),
        );
        let count_sql = format!("SELECT COUNT(*) FROM applications WHERE {FILTER_SQL}");

        let mut tx = begin_snapshot(&self.pool).await?;

        let items = sqlx::query_as::<_, ApplicationEntity>(&query_sql)
            .bind(filter.user_id)
            .bind(filter.recruitment_id)
            .bind(filter.status)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&mut *tx)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.user_id)
            .bind(filter.recruitment_id)
            .bind(filter.status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((items, total))
    }

    async fn create(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationEntity, error::SystemError> {
        let application = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            INSERT INTO applications (recruitment_id, user_id, cv_id, message, status)
            VALUES ($1, $2, $3, $4, 'PENDING')
            RETURNING *
            "#,
        )
        .bind(application.recruitment_id)
        .bind(application.user_id)
        .bind(application.cv_id)
        .bind(&application.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }

    async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<ApplicationEntity, error::SystemError> {
        sqlx::query_as::<_, ApplicationEntity>(
            "UPDATE applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found(format!("Application with id {id} not found")))
    }

    async fn update(
        &self,
        id: i64,
        application: &UpdateApplication,
    ) -> Result<ApplicationEntity, error::SystemError> {
        sqlx::query_as::<_, ApplicationEntity>(
            r#"
        UPDATE applications
        SET
            message    = COALESCE($2, message),
            status     = COALESCE($3, status),
            cv_id      = COALESCE($4, cv_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&application.message)
        .bind(application.status)
        .bind(application.cv_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found(format!("Application with id {id} not found")))
    }
}
