use actix_web::{
    cookie::{time, Cookie},
    get, patch, post, web, HttpRequest,
};

use crate::modules::user::{
    model::{self, SignUpResponse},
    repository_pg::{TokenRepositoryPg, UserRepositoryPg},
    service::UserService,
};
use crate::{
    api::{error, success},
    middlewares::get_claims,
    utils::ValidatedJson,
    ENV,
};

pub type UserSvc = UserService<UserRepositoryPg, TokenRepositoryPg>;

fn refresh_cookie(value: String, max_age: i64) -> Cookie<'static> {
    Cookie::build("refresh_token", value)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(max_age))
        .finish()
}

#[get("/profile")]
pub async fn get_profile(
    user_service: web::Data<UserSvc>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_profile(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[patch("/profile")]
pub async fn update_profile(
    user_service: web::Data<UserSvc>,
    req: HttpRequest,
    body: ValidatedJson<model::UpdateProfileModel>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.update_profile(id, body.0).await?;
    Ok(success::Success::ok(Some(user)).message("Profile updated successfully"))
}

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserSvc>,
    user_data: ValidatedJson<model::SignUpModel>,
) -> Result<success::Success<SignUpResponse>, error::Error> {
    let user_id = user_service.sign_up(user_data.0).await?;
    Ok(success::Success::created(Some(SignUpResponse { id: user_id })).message("Signup successful"))
}

#[post("/signin")]
pub async fn sign_in(
    user_service: web::Data<UserSvc>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let (access_token, refresh_token) = user_service.sign_in(user_data.0).await?;
    let cookie = refresh_cookie(refresh_token.clone(), ENV.refresh_token_expiration as i64);
    let response = model::SignInResponse { access_token, refresh_token };

    Ok(success::Success::ok(Some(response)).message("Signin successful").cookies(vec![cookie]))
}

#[post("/signout")]
pub async fn sign_out(
    user_service: web::Data<UserSvc>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let refresh_token = req.cookie("refresh_token").map(|c| c.value().to_string());
    user_service.sign_out(refresh_token).await?;
    let cookie = Cookie::build("refresh_token", "")
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(0))
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .finish();

    Ok(success::Success::no_content().cookies(vec![cookie]))
}

#[post("/refresh")]
pub async fn refresh(
    user_service: web::Data<UserSvc>,
    req: HttpRequest,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let refresh_token = req.cookie("refresh_token").map(|c| c.value().to_string());
    let (access_token, refresh_token) = user_service.refresh(refresh_token).await?;
    let cookie = refresh_cookie(refresh_token.clone(), ENV.refresh_token_expiration as i64);
    let response = model::SignInResponse { access_token, refresh_token };

    Ok(success::Success::ok(Some(response)).message("Refresh successful").cookies(vec![cookie]))
}
