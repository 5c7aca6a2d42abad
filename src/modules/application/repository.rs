use crate::{
    api::{error, pagination::PageRequest},
    modules::application::{
        model::{ApplicationFilter, NewApplication, UpdateApplication},
        schema::{ApplicationEntity, ApplicationRow, ApplicationStatus},
    },
};

#[async_trait::async_trait]
pub trait ApplicationRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApplicationEntity>, error::SystemError>;

    async fn find_by_recruitment_and_user(
        &self,
        recruitment_id: i64,
        user_id: i64,
    ) -> Result<Option<ApplicationEntity>, error::SystemError>;

    /// Every application of a recruitment with applicant and CV columns joined.
    async fn find_by_recruitment(
        &self,
        recruitment_id: i64,
    ) -> Result<Vec<ApplicationRow>, error::SystemError>;

    /// Items and total count read from the same snapshot.
    async fn find_page(
        &self,
        filter: &ApplicationFilter,
        page: &PageRequest,
    ) -> Result<(Vec<ApplicationEntity>, i64), error::SystemError>;

    /// Fails with `Conflict` on the (recruitment, user) unique key.
    async fn create(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationEntity, error::SystemError>;

    async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<ApplicationEntity, error::SystemError>;

    async fn update(
        &self,
        id: i64,
        application: &UpdateApplication,
    ) -> Result<ApplicationEntity, error::SystemError>;
}
