use async_trait::async_trait;
use kyc_review_db::models::audit::AuditTracked;
use kyc_review_db::models::user::UserModel;
use kyc_review_db::repository::DeleteBatch;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::UserRepositoryImpl;
use crate::repository::audit::insert_audit_links;

#[async_trait]
impl DeleteBatch for UserRepositoryImpl {
    async fn delete_batch(&self, ids: &[Uuid], audit_log_id: Uuid) -> Result<usize, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let deleted: Vec<Uuid> = sqlx::query_scalar("DELETE FROM app_user WHERE id = ANY($1) RETURNING id")
            .bind(ids)
            .fetch_all(&mut **transaction)
            .await?;
        insert_audit_links(&mut **transaction, audit_log_id, UserModel::ENTITY_TYPE, &deleted).await?;

        Ok(deleted.len())
    }
}
