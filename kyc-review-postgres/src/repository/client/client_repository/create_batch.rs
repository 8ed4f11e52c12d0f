use async_trait::async_trait;
use kyc_review_db::models::audit::AuditTracked;
use kyc_review_db::models::client::ClientModel;
use kyc_review_db::repository::CreateBatch;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ClientRepositoryImpl;
use crate::repository::audit::insert_audit_links;

#[async_trait]
impl CreateBatch<ClientModel> for ClientRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ClientModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ClientModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO client (id, agency_id, name, email, client_type, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.id)
            .bind(item.agency_id)
            .bind(item.name.as_str())
            .bind(item.email.as_deref())
            .bind(item.client_type)
            .bind(item.created_at)
            .execute(&mut **transaction)
            .await?;
        }

        let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
        insert_audit_links(&mut **transaction, audit_log_id, ClientModel::ENTITY_TYPE, &ids).await?;

        Ok(items)
    }
}
