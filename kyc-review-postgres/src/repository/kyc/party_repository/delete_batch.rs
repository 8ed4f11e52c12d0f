use async_trait::async_trait;
use kyc_review_db::repository::DeleteBatch;
use std::error::Error;
use uuid::Uuid;

use super::party_table::PartyTable;
use super::repo_impl::PartyRepositoryImpl;
use crate::repository::audit::insert_audit_links;

impl<T: PartyTable> PartyRepositoryImpl<T> {
    pub(super) async fn delete_batch_impl(&self, ids: &[Uuid], audit_log_id: Uuid) -> Result<usize, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(0);
        }

        let sql = format!("DELETE FROM {} WHERE id = ANY($1) RETURNING id", T::TABLE);
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let deleted: Vec<Uuid> = sqlx::query_scalar(&sql).bind(ids).fetch_all(&mut **transaction).await?;
        insert_audit_links(&mut **transaction, audit_log_id, T::ENTITY_TYPE, &deleted).await?;

        Ok(deleted.len())
    }
}

#[async_trait]
impl<T: PartyTable> DeleteBatch for PartyRepositoryImpl<T> {
    async fn delete_batch(&self, ids: &[Uuid], audit_log_id: Uuid) -> Result<usize, Box<dyn Error + Send + Sync>> {
        self.delete_batch_impl(ids, audit_log_id).await
    }
}
