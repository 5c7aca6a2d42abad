use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::file_upload::{
    model::{FileResponse, NewFile, UploadConfig},
    repository::FileRepository,
    schema::FileEntity,
    storage::ObjectStorage,
};

#[derive(Clone)]
pub struct FileUploadService<R>
where
    R: FileRepository + Send + Sync,
{
    file_repo: Arc<R>,
    storage: Arc<dyn ObjectStorage>,
    config: UploadConfig,
}

impl<R> FileUploadService<R>
where
    R: FileRepository + Send + Sync,
{
    pub fn new(file_repo: Arc<R>, storage: Arc<dyn ObjectStorage>, config: UploadConfig) -> Self {
        Self { file_repo, storage, config }
    }

    pub fn max_file_size(&self) -> usize {
        self.config.max_file_size
    }

    /// Declared type wins unless it is missing or the generic octet-stream.
    fn resolve_content_type(&self, name: &str, declared: Option<String>) -> String {
        declared
            .filter(|m| m != "application/octet-stream")
            .unwrap_or_else(|| mime_guess::from_path(name).first_or_octet_stream().to_string())
    }

    fn validate_file(&self, file_size: usize, content_type: &str) -> Result<(), error::SystemError> {
        if file_size == 0 {
            return Err(error::SystemError::bad_request("File is empty"));
        }

        if file_size > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }

        if !self.config.allowed_mime_types.iter().any(|m| m == content_type) {
            return Err(error::SystemError::bad_request(format!(
                "File type '{}' is not allowed",
                content_type
            )));
        }

        Ok(())
    }

    fn object_key(user_id: i64, name: &str) -> String {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let id = Uuid::now_v7();
        if extension.is_empty() {
            format!("cv/{user_id}/{id}")
        } else {
            format!("cv/{user_id}/{id}.{extension}")
        }
    }

    pub async fn upload_file(
        &self,
        user_id: i64,
        name: String,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<FileResponse, error::SystemError> {
        let content_type = self.resolve_content_type(&name, content_type);
        self.validate_file(bytes.len(), &content_type)?;

        let key = Self::object_key(user_id, &name);
        let size = bytes.len() as i64;

        self.storage.put_object(&key, bytes, Some(content_type.clone())).await?;

        let new_file = NewFile { key: key.clone(), name, size, content_type, user_id };
        let file = match self.file_repo.create(&new_file).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete_object(&key).await {
                    tracing::warn!("Orphaned object {} left in storage: {:?}", key, cleanup);
                }
                return Err(e);
            }
        };

        tracing::info!("File {} uploaded by user {}", file.id, user_id);
        let url = self.presign(&file).await?;
        Ok(FileResponse::new(file, url))
    }

    pub async fn find_file(&self, id: i64) -> Result<Option<FileEntity>, error::SystemError> {
        self.file_repo.find_by_id(id).await
    }

    pub async fn presign(&self, file: &FileEntity) -> Result<String, error::SystemError> {
        self.storage.presign_get_object(&file.key, self.config.url_expiration).await
    }

    /// Time-limited URL for downloading the blob behind `file_id`.
    pub async fn resolve_retrieval_url(&self, file_id: i64) -> Result<String, error::SystemError> {
        let file = self.file_repo.find_by_id(file_id).await?.ok_or_else(|| {
            error::SystemError::not_found(format!("File with id {file_id} not found"))
        })?;

        self.presign(&file).await
    }

    async fn owned_file(&self, id: i64, user_id: i64) -> Result<FileEntity, error::SystemError> {
        let file = self
            .file_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| error::SystemError::not_found(format!("File with id {id} not found")))?;

        if file.user_id != user_id {
            return Err(error::SystemError::forbidden(
                "You don't have permission to access this file",
            ));
        }

        Ok(file)
    }

    pub async fn get_file(&self, id: i64, user_id: i64) -> Result<FileResponse, error::SystemError> {
        let file = self.owned_file(id, user_id).await?;
        let url = self.presign(&file).await?;
        Ok(FileResponse::new(file, url))
    }

    pub async fn delete_file(&self, id: i64, user_id: i64) -> Result<(), error::SystemError> {
        let file = self.owned_file(id, user_id).await?;

        self.file_repo.delete(file.id).await?;

        if let Err(e) = self.storage.delete_object(&file.key).await {
            tracing::warn!("Failed to delete object {}: {:?}", file.key, e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{FakeStorage, MemoryStore};

    fn service(
        store: &Arc<MemoryStore>,
        storage: &Arc<FakeStorage>,
    ) -> FileUploadService<MemoryStore> {
        FileUploadService::new(store.clone(), storage.clone(), UploadConfig::default())
    }

    #[actix_web::test]
    async fn upload_stores_object_under_user_prefix() {
        let store = MemoryStore::new();
        let storage = Arc::new(FakeStorage::default());
        let svc = service(&store, &storage);

        let file = svc.upload_file(7, "Resume.PDF".into(), b"%PDF-1.7".to_vec(), None).await.unwrap();

        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.size, 8);
        assert!(!file.url.is_empty());

        let entity = store.file(file.id).unwrap();
        assert!(entity.key.starts_with("cv/7/"));
        assert!(entity.key.ends_with(".pdf"));
        assert!(storage.contains(&entity.key));
    }

    #[actix_web::test]
    async fn upload_rejects_disallowed_types_and_sizes() {
        let store = MemoryStore::new();
        let storage = Arc::new(FakeStorage::default());
        let svc = FileUploadService::new(
            store.clone(),
            storage.clone(),
            UploadConfig { max_file_size: 4, ..UploadConfig::default() },
        );

        let err = svc.upload_file(1, "run.sh".into(), b"ls".to_vec(), None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let err = svc
            .upload_file(1, "cv.pdf".into(), b"too large".to_vec(), Some("application/pdf".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        assert_eq!(storage.len(), 0);
    }

    #[actix_web::test]
    async fn retrieval_url_requires_existing_record() {
        let store = MemoryStore::new();
        let storage = Arc::new(FakeStorage::default());
        let svc = service(&store, &storage);

        let err = svc.resolve_retrieval_url(42).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(m) if m == "File with id 42 not found"));

        let file = store.seed_file(3);
        let url = svc.resolve_retrieval_url(file.id).await.unwrap();
        assert!(url.contains(&file.key));
    }

    #[actix_web::test]
    async fn only_owner_reads_or_deletes() {
        let store = MemoryStore::new();
        let storage = Arc::new(FakeStorage::default());
        let svc = service(&store, &storage);
        let uploaded =
            svc.upload_file(5, "cv.docx".into(), b"PK".to_vec(), None).await.unwrap();

        let err = svc.get_file(uploaded.id, 6).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));
        let err = svc.delete_file(uploaded.id, 6).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        svc.delete_file(uploaded.id, 5).await.unwrap();
        assert!(store.file(uploaded.id).is_none());
        assert_eq!(storage.len(), 0);
    }
}
