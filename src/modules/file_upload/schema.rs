use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Metadata of an uploaded object; `key` addresses the blob in the object store.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FileEntity {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub size: i64,
    pub content_type: String,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
