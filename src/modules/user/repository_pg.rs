use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser, UpsertToken},
        repository::{TokenRepository, UserRepository},
        schema::{TokenEntity, UserEntity, UserRole},
    },
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let user =
            sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn find_by_company_and_role(
        &self,
        company_id: i64,
        role: UserRole,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = sqlx::query_as::<_, UserEntity>(
            "SELECT * FROM users WHERE company_id = $1 AND role = $2 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, hash_password, first_name, last_name, phone, role, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&user.email)
        .bind(&user.hash_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(user.role)
        .bind(user.company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
        UPDATE users
        SET
            first_name = COALESCE($2, first_name),
            last_name  = COALESCE($3, last_name),
            phone      = CASE WHEN $4::boolean THEN $5 ELSE phone END,
            avatar     = CASE WHEN $6::boolean THEN $7 ELSE avatar END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&user.first_name) // $2: Option<String>
        .bind(&user.last_name) // $3: Option<String>
        .bind(user.phone.is_some()) // $4: bool - was phone provided?
        .bind(user.phone.as_ref().and_then(|v| v.as_ref())) // $5: Option<&String>
        .bind(user.avatar.is_some()) // $6: bool - was avatar provided?
        .bind(user.avatar.as_ref().and_then(|v| v.as_ref())) // $7: Option<&String>
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}

#[derive(Clone)]
pub struct TokenRepositoryPg {
    pool: sqlx::PgPool,
}

impl TokenRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TokenRepository for TokenRepositoryPg {
    async fn upsert(&self, token: &UpsertToken) -> Result<TokenEntity, error::SystemError> {
        let token = sqlx::query_as::<_, TokenEntity>(
            r#"
            INSERT INTO tokens (user_id, access_token, refresh_token, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET access_token  = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                expires_at    = EXCLUDED.expires_at,
                updated_at    = NOW()
            RETURNING *
            "#,
        )
        .bind(token.user_id)
        .bind(&token.access_token)
        .bind(&token.refresh_token)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(token)
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Option<TokenEntity>, error::SystemError> {
        let token = sqlx::query_as::<_, TokenEntity>("SELECT * FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(token)
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
