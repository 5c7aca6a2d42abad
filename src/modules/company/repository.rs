use crate::{
    api::{error, pagination::PageRequest},
    modules::{
        company::{
            model::{CompanyFilter, NewCompany, UpdateCompany},
            schema::CompanyEntity,
        },
        user::{model::InsertUser, schema::UserEntity},
    },
};

#[async_trait::async_trait]
pub trait CompanyRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<CompanyEntity>, error::SystemError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<CompanyEntity>, error::SystemError>;

    /// Items and total count read from the same snapshot.
    async fn find_page(
        &self,
        filter: &CompanyFilter,
        page: &PageRequest,
    ) -> Result<(Vec<CompanyEntity>, i64), error::SystemError>;

    /// Creates the company and its first COMPANY_ADMIN atomically.
    /// `admin.company_id` is ignored and replaced by the new company id.
    async fn create_with_admin(
        &self,
        company: &NewCompany,
        admin: &InsertUser,
    ) -> Result<(CompanyEntity, UserEntity), error::SystemError>;

    async fn update(
        &self,
        id: i64,
        company: &UpdateCompany,
    ) -> Result<CompanyEntity, error::SystemError>;

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError>;
}
