use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::user::model::{
    AuthConfig, InsertUser, SignInModel, SignUpModel, UpdateProfileModel, UpdateUser,
    UpsertToken, UserResponse,
};
use crate::modules::user::repository::{TokenRepository, UserRepository};
use crate::modules::user::schema::{UserEntity, UserRole};
use crate::utils::{hash_password, verify_password, Claims, TypeClaims};

pub const USERS_EMAIL_KEY: &str = "users_email_key";

#[derive(Clone)]
pub struct UserService<U, T>
where
    U: UserRepository + Send + Sync,
    T: TokenRepository + Send + Sync,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    config: AuthConfig,
}

impl<U, T> UserService<U, T>
where
    U: UserRepository + Send + Sync,
    T: TokenRepository + Send + Sync,
{
    pub fn with_dependencies(user_repo: Arc<U>, token_repo: Arc<T>, config: AuthConfig) -> Self {
        info!("UserService initialized with dependencies");
        UserService { user_repo, token_repo, config }
    }

    pub async fn get_profile(&self, id: i64) -> Result<UserResponse, error::SystemError> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        Ok(UserResponse::from(user))
    }

    pub async fn update_profile(
        &self,
        id: i64,
        data: UpdateProfileModel,
    ) -> Result<UserResponse, error::SystemError> {
        if data.first_name.is_none()
            && data.last_name.is_none()
            && data.phone.is_none()
            && data.avatar.is_none()
        {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let update = UpdateUser {
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
            avatar: data.avatar,
        };

        let user = self.user_repo.update(id, &update).await?;
        Ok(UserResponse::from(user))
    }

    pub async fn sign_up(&self, data: SignUpModel) -> Result<i64, error::SystemError> {
        if self.user_repo.find_by_email(&data.email).await?.is_some() {
            return Err(error::SystemError::bad_request("Email already exists"));
        }

        let new_user = InsertUser {
            email: data.email,
            hash_password: hash_password(&data.password)?,
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
            role: UserRole::User,
            company_id: None,
        };

        let user = self.user_repo.create(&new_user).await.map_err(|e| {
            if e.is_conflict_on(USERS_EMAIL_KEY) {
                error::SystemError::bad_request("Email already exists")
            } else {
                e
            }
        })?;

        info!("User {} registered", user.id);
        Ok(user.id)
    }

    pub async fn sign_in(&self, data: SignInModel) -> Result<(String, String), error::SystemError> {
        let user = self
            .user_repo
            .find_by_email(&data.email)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid email or password"))?;

        if !verify_password(&user.hash_password, &data.password)? {
            return Err(error::SystemError::unauthorized("Invalid email or password"));
        }

        self.issue_tokens(&user).await
    }

    /// Rotates the refresh token. Only the token currently stored for the user
    /// is accepted.
    pub async fn refresh(
        &self,
        refresh_token: Option<String>,
    ) -> Result<(String, String), error::SystemError> {
        let refresh_token = refresh_token
            .ok_or_else(|| error::SystemError::unauthorized("Refresh token not found"))?;

        let claims = Claims::decode(&refresh_token, self.config.jwt_secret.as_ref())
            .map_err(|_| error::SystemError::unauthorized("Refresh token invalid or expired"))?;

        if !claims.is_type(TypeClaims::RefreshToken) {
            return Err(error::SystemError::unauthorized("Refresh token invalid or expired"));
        }

        let stored = self
            .token_repo
            .find_by_user(claims.sub)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Refresh token revoked"))?;

        if stored.refresh_token != refresh_token {
            return Err(error::SystemError::unauthorized("Refresh token revoked"));
        }

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Unauthorized"))?;

        self.issue_tokens(&user).await
    }

    pub async fn sign_out(&self, refresh_token: Option<String>) -> Result<(), error::SystemError> {
        let Some(token) = refresh_token else {
            return Ok(());
        };

        let claims = Claims::decode(&token, self.config.jwt_secret.as_ref()).ok();
        if let Some(claims) = claims.filter(|c| c.is_type(TypeClaims::RefreshToken)) {
            self.token_repo.delete_by_user(claims.sub).await?;
            info!("User {} signed out", claims.sub);
        }

        Ok(())
    }

    async fn issue_tokens(&self, user: &UserEntity) -> Result<(String, String), error::SystemError> {
        let secret = self.config.jwt_secret.as_bytes();

        let access_token = Claims::new(user.id, &user.role, self.config.access_token_expiration)
            .with_type(TypeClaims::AccessToken)
            .encode(secret)?;

        let refresh_token = Claims::new(user.id, &user.role, self.config.refresh_token_expiration)
            .with_jti(Uuid::now_v7())
            .with_type(TypeClaims::RefreshToken)
            .encode(secret)?;

        let expires_at = chrono::Utc::now()
            + chrono::Duration::seconds(self.config.refresh_token_expiration as i64);

        self.token_repo
            .upsert(&UpsertToken {
                user_id: user.id,
                access_token: access_token.clone(),
                refresh_token: refresh_token.clone(),
                expires_at,
            })
            .await?;

        Ok((access_token, refresh_token))
    }
}
