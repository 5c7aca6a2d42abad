use crate::{
    api::{
        error,
        pagination::{begin_snapshot, PageRequest},
    },
    modules::recruitment::{
        model::{RecruitmentFilter, RecruitmentValues},
        repository::RecruitmentRepository,
        schema::RecruitmentEntity,
    },
};

const FILTER_SQL: &str = r#"
    ($1::bigint IS NULL OR company_id = $1)
    AND ($2::job_type IS NULL OR job_type = $2)
    AND ($3::text IS NULL OR title ILIKE $3)
    AND (NOT $4 OR deadline >= NOW())
"#;

#[derive(Clone)]
pub struct RecruitmentRepositoryPg {
    pool: sqlx::PgPool,
}

impl RecruitmentRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecruitmentRepository for RecruitmentRepositoryPg {
    async fn find_by_id(&self, id: i64) -> Result<Option<RecruitmentEntity>, error::SystemError> {
        let recruitment =
            sqlx::query_as::<_, RecruitmentEntity>("SELECT * FROM recruitments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(recruitment)
    }

    async fn find_page(
        &self,
        filter: &RecruitmentFilter,
        page: &PageRequest,
    ) -> Result<(Vec<RecruitmentEntity>, i64), error::SystemError> {
        let search_pattern = filter
            .search
            .as_deref()
            .map(|q| format!("%{}%", q.replace('%', "\\%").replace('_', "\\_")));

        let query_sql = format!(
            "SELECT * FROM recruitments WHERE {FILTER_SQL} ORDER BY {order}, id DESC LIMIT $5 OFFSET $6",
            order = page.sort.to_sql(),
        );
        let count_sql = format!("SELECT COUNT(*) FROM recruitments WHERE {FILTER_SQL}");

        let mut tx = begin_snapshot(&self.pool).await?;

        let items = sqlx::query_as::<_, RecruitmentEntity>(&query_sql)
            .bind(filter.company_id)
            .bind(filter.job_type)
            .bind(&search_pattern)
            .bind(filter.open_only)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&mut *tx)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.company_id)
            .bind(filter.job_type)
            .bind(&search_pattern)
            .bind(filter.open_only)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((items, total))
    }

    async fn create(
        &self,
        company_id: i64,
        values: &RecruitmentValues,
    ) -> Result<RecruitmentEntity, error::SystemError> {
        let recruitment = sqlx::query_as::<_, RecruitmentEntity>(
            r#"
            INSERT INTO recruitments
                (company_id, title, content, min_salary, max_salary, experience, job_type, deadline)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&values.title)
        .bind(&values.content)
        .bind(values.min_salary)
        .bind(values.max_salary)
        .bind(values.experience)
        .bind(values.job_type)
        .bind(values.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(recruitment)
    }

    async fn update(
        &self,
        id: i64,
        values: &RecruitmentValues,
    ) -> Result<RecruitmentEntity, error::SystemError> {
        let recruitment = sqlx::query_as::<_, RecruitmentEntity>(
            r#"
        UPDATE recruitments
        SET
            title      = $2,
            content    = $3,
            min_salary = $4,
            max_salary = $5,
            experience = $6,
            job_type   = $7,
            deadline   = $8,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&values.title)
        .bind(&values.content)
        .bind(values.min_salary)
        .bind(values.max_salary)
        .bind(values.experience)
        .bind(values.job_type)
        .bind(values.deadline)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            error::SystemError::not_found(format!("Recruitment with id {id} not found"))
        })?;

        Ok(recruitment)
    }

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM recruitments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
