use log::info;
use std::sync::Arc;

use crate::{
    api::{
        error,
        pagination::{Page, PageRequest, Sort},
    },
    modules::{
        company::{
            model::{
                CompanyFilter, CompanyQuery, CompanyWithAdmin, CreateCompanyModel, NewCompany,
                UpdateCompany, UpdateCompanyModel, COMPANY_SORT_FIELDS, DEFAULT_COMPANY_SORT,
            },
            repository::CompanyRepository,
            schema::CompanyEntity,
        },
        user::{
            model::{InsertUser, StaffAccountModel, UserResponse},
            policy::{reconfirm_actor, require_company, require_role, FORBIDDEN},
            repository::UserRepository,
            schema::{UserEntity, UserRole},
            service::USERS_EMAIL_KEY,
        },
    },
    utils::hash_password,
};

pub const COMPANIES_CODE_KEY: &str = "companies_code_key";

#[derive(Clone)]
pub struct CompanyService<C, U>
where
    C: CompanyRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    company_repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<C, U> CompanyService<C, U>
where
    C: CompanyRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(company_repo: Arc<C>, user_repo: Arc<U>) -> Self {
        CompanyService { company_repo, user_repo }
    }

    pub async fn create_company(
        &self,
        data: CreateCompanyModel,
    ) -> Result<CompanyWithAdmin, error::SystemError> {
        if self.company_repo.find_by_code(&data.code).await?.is_some() {
            return Err(error::SystemError::bad_request("Company code already exists"));
        }

        if self.user_repo.find_by_email(&data.admin.email).await?.is_some() {
            return Err(error::SystemError::bad_request("Email already exists"));
        }

        let company = NewCompany {
            code: data.code,
            name: data.name,
            description: data.description,
            address: data.address,
            logo: data.logo,
        };
        let admin = staff_account(data.admin, UserRole::CompanyAdmin, None)?;

        let (company, admin) =
            self.company_repo.create_with_admin(&company, &admin).await.map_err(|e| {
                if e.is_conflict_on(COMPANIES_CODE_KEY) {
                    error::SystemError::bad_request("Company code already exists")
                } else if e.is_conflict_on(USERS_EMAIL_KEY) {
                    error::SystemError::bad_request("Email already exists")
                } else {
                    e
                }
            })?;

        info!("Company {} created with admin {}", company.id, admin.id);
        Ok(CompanyWithAdmin { company, admin: UserResponse::from(admin) })
    }

    pub async fn get_company(&self, id: i64) -> Result<CompanyEntity, error::SystemError> {
        self.company_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| error::SystemError::not_found(format!("Company with id {id} not found")))
    }

    pub async fn list_companies(
        &self,
        query: CompanyQuery,
    ) -> Result<Page<CompanyEntity>, error::SystemError> {
        let sort = Sort::parse(query.sort.as_deref(), COMPANY_SORT_FIELDS, DEFAULT_COMPANY_SORT)?;
        let page = PageRequest::new(query.offset, query.limit, sort);
        let filter = CompanyFilter { search: query.search.filter(|s| !s.trim().is_empty()) };

        let (items, total) = self.company_repo.find_page(&filter, &page).await?;
        Ok(Page::new(items, total, &page))
    }

    /// Company admins edit their own company; the code is immutable here.
    pub async fn update_company(
        &self,
        actor_id: i64,
        data: UpdateCompanyModel,
    ) -> Result<CompanyEntity, error::SystemError> {
        let actor = reconfirm_actor(self.user_repo.as_ref(), actor_id).await?;
        let company_id = require_company(&actor, FORBIDDEN)?;
        require_role(&actor, &[UserRole::CompanyAdmin], FORBIDDEN)?;

        let update = UpdateCompany {
            name: data.name,
            description: data.description,
            address: data.address,
            logo: data.logo,
        };

        self.company_repo.update(company_id, &update).await
    }

    pub async fn delete_company(&self, id: i64) -> Result<(), error::SystemError> {
        if !self.company_repo.delete(id).await? {
            return Err(error::SystemError::not_found(format!("Company with id {id} not found")));
        }
        info!("Company {id} deleted");
        Ok(())
    }

    pub async fn create_company_hr(
        &self,
        actor_id: i64,
        data: StaffAccountModel,
    ) -> Result<UserResponse, error::SystemError> {
        let (_, company_id) = self.company_admin(actor_id).await?;

        if self.user_repo.find_by_email(&data.email).await?.is_some() {
            return Err(error::SystemError::bad_request("Email already exists"));
        }

        let hr = staff_account(data, UserRole::CompanyHr, Some(company_id))?;
        let hr = self.user_repo.create(&hr).await.map_err(|e| {
            if e.is_conflict_on(USERS_EMAIL_KEY) {
                error::SystemError::bad_request("Email already exists")
            } else {
                e
            }
        })?;

        info!("HR {} created for company {}", hr.id, company_id);
        Ok(UserResponse::from(hr))
    }

    pub async fn get_company_hr_list(
        &self,
        actor_id: i64,
    ) -> Result<Vec<UserResponse>, error::SystemError> {
        let (_, company_id) = self.company_admin(actor_id).await?;

        let hrs = self.user_repo.find_by_company_and_role(company_id, UserRole::CompanyHr).await?;
        Ok(hrs.into_iter().map(UserResponse::from).collect())
    }

    pub async fn delete_company_hr(
        &self,
        actor_id: i64,
        hr_id: i64,
    ) -> Result<(), error::SystemError> {
        let (_, company_id) = self.company_admin(actor_id).await?;

        let hr = self
            .user_repo
            .find_by_id(hr_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found(format!("HR with id {hr_id} not found")))?;

        if hr.role != UserRole::CompanyHr || hr.company_id != Some(company_id) {
            return Err(error::SystemError::forbidden("HR not belonging to your company"));
        }

        self.user_repo.delete(hr_id).await?;
        info!("HR {hr_id} removed from company {company_id}");
        Ok(())
    }

    async fn company_admin(&self, actor_id: i64) -> Result<(UserEntity, i64), error::SystemError> {
        let actor = reconfirm_actor(self.user_repo.as_ref(), actor_id).await?;
        let company_id = require_company(&actor, FORBIDDEN)?;
        require_role(&actor, &[UserRole::CompanyAdmin], FORBIDDEN)?;
        Ok((actor, company_id))
    }
}

fn staff_account(
    data: StaffAccountModel,
    role: UserRole,
    company_id: Option<i64>,
) -> Result<InsertUser, error::SystemError> {
    Ok(InsertUser {
        hash_password: hash_password(&data.password)?,
        email: data.email,
        first_name: data.first_name,
        last_name: data.last_name,
        phone: data.phone,
        role,
        company_id,
    })
}
