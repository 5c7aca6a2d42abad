use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser, UpsertToken},
        schema::{TokenEntity, UserEntity, UserRole},
    },
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, error::SystemError>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;

    async fn find_by_company_and_role(
        &self,
        company_id: i64,
        role: UserRole,
    ) -> Result<Vec<UserEntity>, error::SystemError>;

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;

    async fn update(&self, id: i64, user: &UpdateUser) -> Result<UserEntity, error::SystemError>;

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError>;
}

#[async_trait::async_trait]
pub trait TokenRepository {
    /// Inserts or rewrites the single token row of `token.user_id`.
    async fn upsert(&self, token: &UpsertToken) -> Result<TokenEntity, error::SystemError>;

    async fn find_by_user(&self, user_id: i64) -> Result<Option<TokenEntity>, error::SystemError>;

    async fn delete_by_user(&self, user_id: i64) -> Result<bool, error::SystemError>;
}
