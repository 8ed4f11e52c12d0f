use async_trait::async_trait;
use kyc_review_db::models::audit::AuditTracked;
use kyc_review_db::models::kyc::{KycDocumentFileModel, KycModel};
use kyc_review_db::repository::KycDocumentFileRepository;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::KycDocumentFileRepositoryImpl;
use crate::repository::audit::insert_audit_links;

#[async_trait]
impl KycDocumentFileRepository for KycDocumentFileRepositoryImpl {
    async fn link(&self, kyc_id: Uuid, document_id: Uuid, audit_log_id: Uuid) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let link = KycDocumentFileModel::new(kyc_id, document_id);
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let rows_affected = sqlx::query(
            r#"
            INSERT INTO kyc_document_file (kyc_id, document_id, linked_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (kyc_id, document_id) DO NOTHING
            "#,
        )
        .bind(link.kyc_id)
        .bind(link.document_id)
        .bind(link.linked_at)
        .execute(&mut **transaction)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Ok(false);
        }
        insert_audit_links(&mut **transaction, audit_log_id, KycDocumentFileModel::ENTITY_TYPE, &[document_id]).await?;
        insert_audit_links(&mut **transaction, audit_log_id, KycModel::ENTITY_TYPE, &[kyc_id]).await?;
        Ok(true)
    }

    async fn unlink(&self, kyc_id: Uuid, document_id: Uuid, audit_log_id: Uuid) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let rows_affected = sqlx::query("DELETE FROM kyc_document_file WHERE kyc_id = $1 AND document_id = $2")
            .bind(kyc_id)
            .bind(document_id)
            .execute(&mut **transaction)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(false);
        }
        insert_audit_links(&mut **transaction, audit_log_id, KycDocumentFileModel::ENTITY_TYPE, &[document_id]).await?;
        insert_audit_links(&mut **transaction, audit_log_id, KycModel::ENTITY_TYPE, &[kyc_id]).await?;
        Ok(true)
    }
}
