use actix_web::{delete, get, post, put, web, HttpRequest};

use crate::{
    api::{error, pagination::Page, success},
    middlewares::get_claims,
    modules::{
        company::{
            model::{CompanyQuery, CompanyWithAdmin, CreateCompanyModel, UpdateCompanyModel},
            repository_pg::CompanyRepositoryPg,
            schema::CompanyEntity,
            service::CompanyService,
        },
        user::{
            model::{StaffAccountModel, UserResponse},
            repository_pg::UserRepositoryPg,
        },
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type CompanySvc = CompanyService<CompanyRepositoryPg, UserRepositoryPg>;

#[get("")]
pub async fn list_companies(
    company_service: web::Data<CompanySvc>,
    query: ValidatedQuery<CompanyQuery>,
) -> Result<success::Success<Page<CompanyEntity>>, error::Error> {
    let page = company_service.list_companies(query.0).await?;
    Ok(success::Success::ok(Some(page)).message("Companies retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_company(
    company_service: web::Data<CompanySvc>,
    id: web::Path<i64>,
) -> Result<success::Success<CompanyEntity>, error::Error> {
    let company = company_service.get_company(id.into_inner()).await?;
    Ok(success::Success::ok(Some(company)).message("Company retrieved successfully"))
}

#[post("")]
pub async fn create_company(
    company_service: web::Data<CompanySvc>,
    body: ValidatedJson<CreateCompanyModel>,
) -> Result<success::Success<CompanyWithAdmin>, error::Error> {
    let created = company_service.create_company(body.0).await?;
    Ok(success::Success::created(Some(created)).message("Company created successfully"))
}

#[delete("/{id}")]
pub async fn delete_company(
    company_service: web::Data<CompanySvc>,
    id: web::Path<i64>,
) -> Result<success::Success<()>, error::Error> {
    company_service.delete_company(id.into_inner()).await?;
    Ok(success::Success::no_content())
}

#[put("")]
pub async fn update_own_company(
    company_service: web::Data<CompanySvc>,
    body: ValidatedJson<UpdateCompanyModel>,
    req: HttpRequest,
) -> Result<success::Success<CompanyEntity>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let company = company_service.update_company(actor_id, body.0).await?;
    Ok(success::Success::ok(Some(company)).message("Company updated successfully"))
}

#[post("")]
pub async fn create_company_hr(
    company_service: web::Data<CompanySvc>,
    body: ValidatedJson<StaffAccountModel>,
    req: HttpRequest,
) -> Result<success::Success<UserResponse>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let hr = company_service.create_company_hr(actor_id, body.0).await?;
    Ok(success::Success::created(Some(hr)).message("HR account created successfully"))
}

#[get("")]
pub async fn list_company_hrs(
    company_service: web::Data<CompanySvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<UserResponse>>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let hrs = company_service.get_company_hr_list(actor_id).await?;
    Ok(success::Success::ok(Some(hrs)).message("HR accounts retrieved successfully"))
}

#[delete("/{id}")]
pub async fn delete_company_hr(
    company_service: web::Data<CompanySvc>,
    id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    company_service.delete_company_hr(actor_id, id.into_inner()).await?;
    Ok(success::Success::no_content())
}
