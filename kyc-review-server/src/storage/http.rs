use std::time::Duration;

use async_trait::async_trait;
use kyc_review_api::{ApiError, ApiResult, FileStorage, StoredFile};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, error};

/// Uploads files to the hosted storage service with `POST {base_url}/upload`.
///
/// The raw bytes are the request body; the service answers with the public
/// URL of the stored file.
pub struct HttpFileStorage {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    size: Option<i64>,
}

impl HttpFileStorage {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }
}

#[async_trait]
impl FileStorage for HttpFileStorage {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str, file_name: &str) -> ApiResult<StoredFile> {
        let size = bytes.len() as i64;
        let mut request = self
            .client
            .post(self.upload_url())
            .query(&[("name", file_name)])
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!(file_name, error = %e, "File upload request failed");
            ApiError::UpstreamError(format!("file storage unreachable: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(file_name, %status, "File storage rejected upload");
            return Err(ApiError::UpstreamError(format!("file storage returned {status}")));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ApiError::UpstreamError(format!("invalid file storage response: {e}")))?;
        debug!(file_name, url = %body.url, "File stored");

        Ok(StoredFile {
            url: body.url,
            size: body.size.unwrap_or(size),
            content_type: content_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_ignores_trailing_slash() {
        let storage = HttpFileStorage::new("https://files.example.com/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(storage.upload_url(), "https://files.example.com/upload");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_upstream_error() {
        // Port 9 (discard) on localhost refuses connections.
        let storage = HttpFileStorage::new("http://127.0.0.1:9", Some("token".to_string()), Duration::from_secs(2)).unwrap();
        let error = storage
            .upload(vec![1, 2, 3], "application/pdf", "statement.pdf")
            .await
            .unwrap_err();
        assert_eq!(error.kind(), "upstream");
    }
}
