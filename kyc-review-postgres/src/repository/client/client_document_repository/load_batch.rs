use async_trait::async_trait;
use kyc_review_db::models::client::ClientDocumentModel;
use kyc_review_db::repository::LoadBatch;
use std::collections::HashMap;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::{ClientDocumentRepositoryImpl, DOCUMENT_COLUMNS};
use crate::utils::TryFromRow;

#[async_trait]
impl LoadBatch<ClientDocumentModel> for ClientDocumentRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<ClientDocumentModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {DOCUMENT_COLUMNS} FROM client_document WHERE id = ANY($1)");
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(&query).bind(ids).fetch_all(&mut **transaction).await?
        };

        let mut item_map = HashMap::new();
        for row in rows {
            let item = ClientDocumentModel::try_from_row(&row)?;
            item_map.insert(item.id, item);
        }

        Ok(ids.iter().map(|id| item_map.remove(id)).collect())
    }
}
