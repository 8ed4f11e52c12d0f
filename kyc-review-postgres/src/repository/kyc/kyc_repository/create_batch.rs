use async_trait::async_trait;
use kyc_review_db::models::audit::AuditTracked;
use kyc_review_db::models::kyc::KycModel;
use kyc_review_db::repository::CreateBatch;
use sqlx::types::Json;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::{services_to_column, KycRepositoryImpl};
use crate::repository::audit::insert_audit_links;

impl KycRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &KycRepositoryImpl,
        items: Vec<KycModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<KycModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            item.seal(audit_log_id)?;

            sqlx::query(
                r#"
                INSERT INTO kyc (id, client_id, agency_id, kyc_type, status, services, details, review, created_at, updated_at, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(item.id)
            .bind(item.client_id)
            .bind(item.agency_id)
            .bind(item.kyc_type)
            .bind(item.status)
            .bind(services_to_column(&item.services))
            .bind(Json(item.details.clone()))
            .bind(Json(item.review.clone()))
            .bind(item.created_at)
            .bind(item.updated_at)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            saved_items.push(item);
        }

        let ids: Vec<Uuid> = saved_items.iter().map(|item| item.id).collect();
        insert_audit_links(&mut **transaction, audit_log_id, KycModel::ENTITY_TYPE, &ids).await?;

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<KycModel> for KycRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<KycModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<KycModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
