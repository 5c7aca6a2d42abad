use actix_web::{get, post, put, web, HttpRequest};

use crate::{
    api::{error, pagination::Page, success},
    middlewares::get_claims,
    modules::{
        application::{
            model::{
                ApplicationDetail, ApplicationListItem, ApplicationQuery, CreateApplicationModel,
                UpdateApplicationModel,
            },
            repository_pg::ApplicationRepositoryPg,
            schema::ApplicationEntity,
            service::ApplicationService,
        },
        company::repository_pg::CompanyRepositoryPg,
        file_upload::repository_pg::FileRepositoryPg,
        recruitment::repository_pg::RecruitmentRepositoryPg,
        user::repository_pg::UserRepositoryPg,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type ApplicationSvc = ApplicationService<
    ApplicationRepositoryPg,
    RecruitmentRepositoryPg,
    CompanyRepositoryPg,
    UserRepositoryPg,
    FileRepositoryPg,
>;

#[post("")]
pub async fn create_application(
    application_service: web::Data<ApplicationSvc>,
    body: ValidatedJson<CreateApplicationModel>,
    req: HttpRequest,
) -> Result<success::Success<ApplicationEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let application = application_service.create(user_id, body.0).await?;
    Ok(success::Success::created(Some(application)).message("Application submitted successfully"))
}

#[get("/recruitments/{id}")]
pub async fn get_own_application(
    application_service: web::Data<ApplicationSvc>,
    recruitment_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<ApplicationDetail>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let application = application_service
        .find_by_recruitment_and_user(recruitment_id.into_inner(), user_id)
        .await?;
    Ok(success::Success::ok(Some(application)).message("Application retrieved successfully"))
}

#[get("/{id}/applications")]
pub async fn list_recruitment_applications(
    application_service: web::Data<ApplicationSvc>,
    recruitment_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ApplicationListItem>>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let applications =
        application_service.find_by_recruitment(recruitment_id.into_inner(), actor_id).await?;
    Ok(success::Success::ok(Some(applications)).message("Applications retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_application_detail(
    application_service: web::Data<ApplicationSvc>,
    id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<ApplicationDetail>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let application = application_service.get_application_detail(id.into_inner(), actor_id).await?;
    Ok(success::Success::ok(Some(application)).message("Application retrieved successfully"))
}

#[put("/{id}/approve")]
pub async fn approve_application(
    application_service: web::Data<ApplicationSvc>,
    id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<ApplicationEntity>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let application =
        application_service.update_application_status(id.into_inner(), actor_id, true).await?;
    Ok(success::Success::ok(Some(application)).message("Application approved"))
}

#[put("/{id}/reject")]
pub async fn reject_application(
    application_service: web::Data<ApplicationSvc>,
    id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<ApplicationEntity>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let application =
        application_service.update_application_status(id.into_inner(), actor_id, false).await?;
    Ok(success::Success::ok(Some(application)).message("Application rejected"))
}

#[get("")]
pub async fn list_applications(
    application_service: web::Data<ApplicationSvc>,
    query: ValidatedQuery<ApplicationQuery>,
) -> Result<success::Success<Page<ApplicationEntity>>, error::Error> {
    let page = application_service.find_all(query.0).await?;
    Ok(success::Success::ok(Some(page)).message("Applications retrieved successfully"))
}

#[put("/{id}")]
pub async fn update_application(
    application_service: web::Data<ApplicationSvc>,
    id: web::Path<i64>,
    body: ValidatedJson<UpdateApplicationModel>,
) -> Result<success::Success<ApplicationEntity>, error::Error> {
    let application = application_service.update_application(id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(application)).message("Application updated successfully"))
}
