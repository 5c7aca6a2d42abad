use actix_web::{delete, get, post, put, web, HttpRequest};

use crate::{
    api::{error, pagination::Page, success},
    middlewares::get_claims,
    modules::{
        company::repository_pg::CompanyRepositoryPg,
        recruitment::{
            model::{CreateRecruitmentModel, RecruitmentQuery, UpdateRecruitmentModel},
            repository_pg::RecruitmentRepositoryPg,
            schema::RecruitmentEntity,
            service::RecruitmentService,
        },
        user::repository_pg::UserRepositoryPg,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type RecruitmentSvc =
    RecruitmentService<RecruitmentRepositoryPg, CompanyRepositoryPg, UserRepositoryPg>;

#[get("")]
pub async fn list_recruitments(
    recruitment_service: web::Data<RecruitmentSvc>,
    query: ValidatedQuery<RecruitmentQuery>,
) -> Result<success::Success<Page<RecruitmentEntity>>, error::Error> {
    let page = recruitment_service.find_all(query.0).await?;
    Ok(success::Success::ok(Some(page)).message("Recruitments retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_recruitment(
    recruitment_service: web::Data<RecruitmentSvc>,
    id: web::Path<i64>,
) -> Result<success::Success<RecruitmentEntity>, error::Error> {
    let recruitment = recruitment_service.find_one(id.into_inner()).await?;
    Ok(success::Success::ok(Some(recruitment)).message("Recruitment retrieved successfully"))
}

#[post("")]
pub async fn create_recruitment(
    recruitment_service: web::Data<RecruitmentSvc>,
    body: ValidatedJson<CreateRecruitmentModel>,
    req: HttpRequest,
) -> Result<success::Success<RecruitmentEntity>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let recruitment = recruitment_service.create_recruitment(actor_id, body.0).await?;
    Ok(success::Success::created(Some(recruitment)).message("Recruitment created successfully"))
}

#[put("/{id}")]
pub async fn update_recruitment(
    recruitment_service: web::Data<RecruitmentSvc>,
    id: web::Path<i64>,
    body: ValidatedJson<UpdateRecruitmentModel>,
    req: HttpRequest,
) -> Result<success::Success<RecruitmentEntity>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let recruitment =
        recruitment_service.update_recruitment(id.into_inner(), actor_id, body.0).await?;
    Ok(success::Success::ok(Some(recruitment)).message("Recruitment updated successfully"))
}

#[delete("/{id}")]
pub async fn delete_recruitment(
    recruitment_service: web::Data<RecruitmentSvc>,
    id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    recruitment_service.delete_recruitment(id.into_inner(), actor_id).await?;
    Ok(success::Success::no_content())
}
