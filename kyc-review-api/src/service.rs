use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

/// Result of storing a file with the hosted file-storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub url: String,
    pub size: i64,
    pub content_type: String,
}

/// Hosted file-storage capability.
///
/// Uploads are awaited by the caller before it proceeds; failures surface as
/// [`crate::ApiError::UpstreamError`]. Stored files are never deleted by this
/// service.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str, file_name: &str) -> ApiResult<StoredFile>;
}
