use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::pagination::{Sort, SortDirection};
use crate::modules::company::schema::CompanyEntity;
use crate::modules::user::model::{StaffAccountModel, UserResponse};
use crate::utils::double_option;

pub const COMPANY_SORT_FIELDS: &[(&str, &str)] =
    &[("id", "id"), ("name", "name"), ("code", "code"), ("created_at", "created_at")];

pub const DEFAULT_COMPANY_SORT: Sort = Sort { column: "created_at", direction: SortDirection::Desc };

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompanyModel {
    #[validate(length(min = 3, max = 10, message = "Code must be 3 to 10 characters long"))]
    pub code: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: String,
    pub logo: Option<String>,
    #[validate(nested)]
    pub admin: StaffAccountModel,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCompanyModel {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CompanyQuery {
    pub search: Option<String>,
    #[validate(range(min = 0, message = "Offset cannot be negative"))]
    pub offset: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub code: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub logo: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyWithAdmin {
    pub company: CompanyEntity,
    pub admin: UserResponse,
}
