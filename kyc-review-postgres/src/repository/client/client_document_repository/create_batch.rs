use async_trait::async_trait;
use kyc_review_db::models::audit::AuditTracked;
use kyc_review_db::models::client::ClientDocumentModel;
use kyc_review_db::repository::CreateBatch;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ClientDocumentRepositoryImpl;
use crate::repository::audit::insert_audit_links;

impl ClientDocumentRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &ClientDocumentRepositoryImpl,
        items: Vec<ClientDocumentModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ClientDocumentModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO client_document (id, client_id, name, url, content_type, size, expires_at, is_signature, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id)
            .bind(item.client_id)
            .bind(item.name.as_str())
            .bind(item.url.as_str())
            .bind(item.content_type.as_str())
            .bind(item.size)
            .bind(item.expires_at)
            .bind(item.is_signature)
            .bind(item.created_at)
            .execute(&mut **transaction)
            .await?;
        }

        let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
        insert_audit_links(&mut **transaction, audit_log_id, ClientDocumentModel::ENTITY_TYPE, &ids).await?;

        Ok(items)
    }
}

#[async_trait]
impl CreateBatch<ClientDocumentModel> for ClientDocumentRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ClientDocumentModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ClientDocumentModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{create_test_audit_log, create_test_client, create_test_document, setup_test_context};
    use kyc_review_db::repository::{AuditLogRepository, FindByClientId, LoadBatch};

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL instance"]
    async fn test_create_and_list_documents() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;
        let client = create_test_client(&ctx, audit_log.id).await?;
        let document = create_test_document(&ctx, client.id, audit_log.id).await?;

        let loaded = repos.client_document_repository.load_batch(&[document.id]).await?;
        assert_eq!(loaded[0].as_ref().map(|d| d.url.clone()), Some(document.url.clone()));

        let listed = repos.client_document_repository.find_by_client_id(client.id).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content_type.as_str(), "application/pdf");

        Ok(())
    }
}
