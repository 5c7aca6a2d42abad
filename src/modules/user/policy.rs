//! Guards shared by every privileged operation.
//!
//! The principal carried by the access token may be stale (role changed, staff
//! removed from a company), so privileged services always re-read the actor
//! from the store before checking role or company membership.

use std::borrow::Cow;

use crate::{
    api::error,
    modules::user::{
        repository::UserRepository,
        schema::{UserEntity, UserRole},
    },
};

pub const FORBIDDEN: &str = "Forbidden";

/// Re-reads the actor; a missing row means the token no longer maps to a user.
pub async fn reconfirm_actor<U>(repo: &U, actor_id: i64) -> Result<UserEntity, error::SystemError>
where
    U: UserRepository + Send + Sync + ?Sized,
{
    repo.find_by_id(actor_id).await?.ok_or_else(|| error::SystemError::unauthorized("Unauthorized"))
}

pub fn require_company(
    actor: &UserEntity,
    msg: impl Into<Cow<'static, str>>,
) -> Result<i64, error::SystemError> {
    actor.company_id.ok_or_else(|| error::SystemError::forbidden(msg))
}

pub fn require_role(
    actor: &UserEntity,
    roles: &[UserRole],
    msg: impl Into<Cow<'static, str>>,
) -> Result<(), error::SystemError> {
    if roles.contains(&actor.role) {
        Ok(())
    } else {
        Err(error::SystemError::forbidden(msg))
    }
}
