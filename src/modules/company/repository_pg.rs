use crate::{
    api::{
        error,
        pagination::{begin_snapshot, PageRequest},
    },
    modules::{
        company::{
            model::{CompanyFilter, NewCompany, UpdateCompany},
            repository::CompanyRepository,
            schema::CompanyEntity,
        },
        user::{model::InsertUser, schema::UserEntity},
    },
};

#[derive(Clone)]
pub struct CompanyRepositoryPg {
    pool: sqlx::PgPool,
}

impl CompanyRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CompanyRepository for CompanyRepositoryPg {
    async fn find_by_id(&self, id: i64) -> Result<Option<CompanyEntity>, error::SystemError> {
        let company = sqlx::query_as::<_, CompanyEntity>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<CompanyEntity>, error::SystemError> {
        let company =
            sqlx::query_as::<_, CompanyEntity>("SELECT * FROM companies WHERE code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(company)
    }

    async fn find_page(
        &self,
        filter: &CompanyFilter,
        page: &PageRequest,
    ) -> Result<(Vec<CompanyEntity>, i64), error::SystemError> {
        let search_pattern = filter
            .search
            .as_deref()
            .map(|q| format!("%{}%", q.replace('%', "\\%").replace('_', "\\_")));

        let query_sql = format!(
            r#"
            SELECT * FROM companies
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY {order}, id DESC
            LIMIT $2 OFFSET $3
            "#,
            order = page.sort.to_sql(),
        );

        let mut tx = begin_snapshot(&self.pool).await?;

        let items = sqlx::query_as::<_, CompanyEntity>(&query_sql)
            .bind(&search_pattern)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&mut *tx)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM companies WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&search_pattern)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((items, total))
    }

    async fn create_with_admin(
        &self,
        company: &NewCompany,
        admin: &InsertUser,
    ) -> Result<(CompanyEntity, UserEntity), error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let company = sqlx::query_as::<_, CompanyEntity>(
            r#"
            INSERT INTO companies (code, name, description, address, logo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&company.code)
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.address)
        .bind(&company.logo)
        .fetch_one(tx.as_mut())
        .await?;

        let admin = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, hash_password, first_name, last_name, phone, role, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&admin.email)
        .bind(&admin.hash_password)
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .bind(&admin.phone)
        .bind(admin.role)
        .bind(company.id)
        .fetch_one(tx.as_mut())
        .await?;

        tx.commit().await?;

        Ok((company, admin))
    }

    async fn update(
        &self,
        id: i64,
        company: &UpdateCompany,
    ) -> Result<CompanyEntity, error::SystemError> {
        let company = sqlx::query_as::<_, CompanyEntity>(
            r#"
        UPDATE companies
        SET
            name        = COALESCE($2, name),
            description = COALESCE($3, description),
            address     = COALESCE($4, address),
            logo        = CASE WHEN $5::boolean THEN $6 ELSE logo END,
            updated_at  = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.address)
        .bind(company.logo.is_some())
        .bind(company.logo.as_ref().and_then(|v| v.as_ref()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found(format!("Company with id {id} not found")))?;

        Ok(company)
    }

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
