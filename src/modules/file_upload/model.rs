use serde::Serialize;
use std::time::Duration;

use crate::modules::file_upload::schema::FileEntity;

#[derive(Debug, Clone)]
pub struct NewFile {
    pub key: String,
    pub name: String,
    pub size: i64,
    pub content_type: String,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub allowed_mime_types: Vec<String>,
    pub url_expiration: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10MB
            allowed_mime_types: vec![
                "application/pdf".to_string(),
                "application/msword".to_string(),
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                    .to_string(),
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/webp".to_string(),
            ],
            url_expiration: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: i64,
    pub name: String,
    pub size: i64,
    pub content_type: String,
    pub url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl FileResponse {
    pub fn new(file: FileEntity, url: String) -> Self {
        Self {
            id: file.id,
            name: file.name,
            size: file.size,
            content_type: file.content_type,
            url,
            created_at: file.created_at,
        }
    }
}
