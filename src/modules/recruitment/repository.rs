use crate::{
    api::{error, pagination::PageRequest},
    modules::recruitment::{
        model::{RecruitmentFilter, RecruitmentValues},
        schema::RecruitmentEntity,
    },
};

#[async_trait::async_trait]
pub trait RecruitmentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<RecruitmentEntity>, error::SystemError>;

    /// Items and total count read from the same snapshot.
    async fn find_page(
        &self,
        filter: &RecruitmentFilter,
        page: &PageRequest,
    ) -> Result<(Vec<RecruitmentEntity>, i64), error::SystemError>;

    async fn create(
        &self,
        company_id: i64,
        values: &RecruitmentValues,
    ) -> Result<RecruitmentEntity, error::SystemError>;

    async fn update(
        &self,
        id: i64,
        values: &RecruitmentValues,
    ) -> Result<RecruitmentEntity, error::SystemError>;

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError>;
}
