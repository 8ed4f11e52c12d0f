use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use kyc_review_api::{ApiError, ApiResult, FileStorage, StoredFile};
use parking_lot::Mutex;

/// File storage kept in process memory, addressed by content hash.
pub struct MemoryFileStorage {
    base_url: String,
    files: Mutex<HashMap<String, Vec<u8>>>,
    unavailable: AtomicBool,
}

impl MemoryFileStorage {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            files: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every upload fail with an upstream error while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }

    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        self.files.lock().get(url).cloned()
    }
}

impl Default for MemoryFileStorage {
    fn default() -> Self {
        Self::new("memory://files")
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str, file_name: &str) -> ApiResult<StoredFile> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ApiError::UpstreamError("file storage unavailable".to_string()));
        }
        let digest = blake3::hash(&bytes);
        let url = format!("{}/{}/{}", self.base_url, digest.to_hex(), file_name);
        let size = bytes.len() as i64;
        self.files.lock().insert(url.clone(), bytes);
        Ok(StoredFile {
            url,
            size,
            content_type: content_type.to_string(),
        })
    }
}
