use async_trait::async_trait;
use kyc_review_db::models::client::ClientDocumentModel;
use kyc_review_db::repository::FindByClientId;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::{ClientDocumentRepositoryImpl, DOCUMENT_COLUMNS};
use crate::utils::TryFromRow;

#[async_trait]
impl FindByClientId<ClientDocumentModel> for ClientDocumentRepositoryImpl {
    async fn find_by_client_id(&self, client_id: Uuid) -> Result<Vec<ClientDocumentModel>, Box<dyn Error + Send + Sync>> {
        let query = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM client_document WHERE client_id = $1 ORDER BY created_at DESC, id"
        );
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(&query).bind(client_id).fetch_all(&mut **transaction).await?
        };

        rows.iter().map(ClientDocumentModel::try_from_row).collect()
    }
}
