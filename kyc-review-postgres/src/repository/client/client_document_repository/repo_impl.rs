use kyc_review_db::models::client::ClientDocumentModel;
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::error::Error;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct ClientDocumentRepositoryImpl {
    pub(crate) executor: Executor,
}

impl ClientDocumentRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

pub(super) const DOCUMENT_COLUMNS: &str = "id, client_id, name, url, content_type, size, expires_at, is_signature, created_at";

impl TryFromRow<PgRow> for ClientDocumentModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ClientDocumentModel {
            id: row.try_get("id")?,
            client_id: row.try_get("client_id")?,
            name: row.try_get("name")?,
            url: row.try_get("url")?,
            content_type: get_heapless_string(row, "content_type")?,
            size: row.try_get("size")?,
            expires_at: row.try_get("expires_at")?,
            is_signature: row.try_get("is_signature")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
