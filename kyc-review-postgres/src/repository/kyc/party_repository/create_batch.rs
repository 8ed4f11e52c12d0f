use async_trait::async_trait;
use kyc_review_db::repository::CreateBatch;
use std::error::Error;
use uuid::Uuid;

use super::party_table::PartyTable;
use super::repo_impl::PartyRepositoryImpl;
use crate::repository::audit::insert_audit_links;

impl<T: PartyTable> PartyRepositoryImpl<T> {
    pub(super) async fn create_batch_impl(&self, items: Vec<T>, audit_log_id: Uuid) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let sql = T::insert_sql();
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            let query = sqlx::query(&sql).bind(item.get_id()).bind(item.kyc_id());
            item.bind_columns(query).execute(&mut **transaction).await?;
        }

        let ids: Vec<Uuid> = items.iter().map(|item| item.get_id()).collect();
        insert_audit_links(&mut **transaction, audit_log_id, T::ENTITY_TYPE, &ids).await?;

        Ok(items)
    }
}

#[async_trait]
impl<T: PartyTable> CreateBatch<T> for PartyRepositoryImpl<T> {
    async fn create_batch(&self, items: Vec<T>, audit_log_id: Uuid) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        self.create_batch_impl(items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::kyc::kyc_repository::test_utils::test_utils::create_test_kyc;
    use crate::test_helper::{create_test_audit_log, create_test_client, setup_test_context};
    use kyc_review_api::ShareholderInput;
    use kyc_review_db::models::kyc::{PartyModel, ShareholderModel};
    use kyc_review_db::repository::{AuditLogRepository, CreateBatch, FindByKycId};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL instance"]
    async fn test_create_and_find_shareholders() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;
        let client = create_test_client(&ctx, audit_log.id).await?;
        let kyc = repos
            .kyc_repository
            .create_batch(vec![create_test_kyc(&client)], audit_log.id)
            .await?
            .remove(0);

        let shareholder = ShareholderModel::from_input(
            Uuid::new_v4(),
            kyc.id,
            ShareholderInput {
                name: "Holding SA".to_string(),
                ownership_percentage: Some(Decimal::new(5050, 2)),
                is_legal_entity: true,
                ..Default::default()
            },
        );
        repos
            .shareholder_repository
            .create_batch(vec![shareholder.clone()], audit_log.id)
            .await?;

        let found = repos.shareholder_repository.find_by_kyc_id(kyc.id).await?;
        assert_eq!(found, vec![shareholder]);

        Ok(())
    }
}
