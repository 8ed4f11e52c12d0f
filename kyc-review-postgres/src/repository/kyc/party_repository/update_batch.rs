use async_trait::async_trait;
use kyc_review_db::repository::UpdateBatch;
use std::error::Error;
use uuid::Uuid;

use super::party_table::PartyTable;
use super::repo_impl::PartyRepositoryImpl;
use crate::repository::audit::insert_audit_links;

impl<T: PartyTable> PartyRepositoryImpl<T> {
    pub(super) async fn update_batch_impl(&self, items: Vec<T>, audit_log_id: Uuid) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let sql = T::update_sql();
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            let query = sqlx::query(&sql).bind(item.get_id()).bind(item.kyc_id());
            let rows_affected = item.bind_columns(query).execute(&mut **transaction).await?.rows_affected();
            if rows_affected == 0 {
                return Err(format!("{} {} not found for update", T::TABLE, item.get_id()).into());
            }
        }

        let ids: Vec<Uuid> = items.iter().map(|item| item.get_id()).collect();
        insert_audit_links(&mut **transaction, audit_log_id, T::ENTITY_TYPE, &ids).await?;

        Ok(items)
    }
}

#[async_trait]
impl<T: PartyTable> UpdateBatch<T> for PartyRepositoryImpl<T> {
    async fn update_batch(&self, items: Vec<T>, audit_log_id: Uuid) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        self.update_batch_impl(items, audit_log_id).await
    }
}
