use async_trait::async_trait;
use kyc_review_db::models::audit::AuditTracked;
use kyc_review_db::models::kyc::KycModel;
use kyc_review_db::repository::{ConcurrentUpdateError, UpdateBatch};
use sqlx::types::Json;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::KycRepositoryImpl;
use crate::repository::audit::insert_audit_links;

impl KycRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<KycModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<KycModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated_items = Vec::with_capacity(items.len());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            let previous_hash = item.hash;
            item.seal(audit_log_id)?;

            // client_id, agency_id, kyc_type and services are immutable
            let rows_affected = sqlx::query(
                r#"
                UPDATE kyc SET
                status = $2, details = $3, review = $4, updated_at = $5,
                hash = $6, audit_log_id = $7
                WHERE id = $1 AND hash = $8
                "#,
            )
            .bind(item.id)
            .bind(item.status)
            .bind(Json(item.details.clone()))
            .bind(Json(item.review.clone()))
            .bind(item.updated_at)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .bind(previous_hash)
            .execute(&mut **transaction)
            .await?
            .rows_affected();

            if rows_affected == 0 {
                return Err(Box::new(ConcurrentUpdateError {
                    entity_type: KycModel::ENTITY_TYPE,
                    id: item.id,
                }));
            }

            updated_items.push(item);
        }

        let ids: Vec<Uuid> = updated_items.iter().map(|item| item.id).collect();
        insert_audit_links(&mut **transaction, audit_log_id, KycModel::ENTITY_TYPE, &ids).await?;

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<KycModel> for KycRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<KycModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<KycModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_utils::create_test_kyc;
    use crate::test_helper::{create_test_audit_log, create_test_client, setup_test_context};
    use kyc_review_api::KycStatus;
    use kyc_review_db::repository::{is_concurrent_update, AuditLogRepository, CreateBatch, UpdateBatch};

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL instance"]
    async fn test_update_detects_stale_hash() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;
        let client = create_test_client(&ctx, audit_log.id).await?;
        let saved = repos
            .kyc_repository
            .create_batch(vec![create_test_kyc(&client)], audit_log.id)
            .await?
            .remove(0);

        let update_log = create_test_audit_log();
        repos.audit_log_repository.create(&update_log).await?;
        let mut advanced = saved.clone();
        advanced.status = KycStatus::ResponsibleReviewed;
        let updated = repos.kyc_repository.update_batch(vec![advanced], update_log.id).await?;
        assert_ne!(updated[0].hash, saved.hash);
        assert_eq!(updated[0].audit_log_id, Some(update_log.id));

        let mut stale = saved.clone();
        stale.status = KycStatus::ResponsibleReviewed;
        let error = repos
            .kyc_repository
            .update_batch(vec![stale], update_log.id)
            .await
            .unwrap_err();
        assert!(is_concurrent_update(error.as_ref()));

        Ok(())
    }
}
