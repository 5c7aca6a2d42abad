use crate::{
    api::error,
    modules::file_upload::{model::NewFile, schema::FileEntity},
};

#[async_trait::async_trait]
pub trait FileRepository {
    async fn create(&self, file: &NewFile) -> Result<FileEntity, error::SystemError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<FileEntity>, error::SystemError>;

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError>;
}
