use async_trait::async_trait;
use kyc_review_db::models::kyc::KycModel;
use kyc_review_db::repository::{FindByAgencyId, Page, PageRequest};
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::{KycRepositoryImpl, KYC_COLUMNS};
use crate::utils::TryFromRow;

impl KycRepositoryImpl {
    pub(super) async fn find_by_agency_id_impl(
        repo: &KycRepositoryImpl,
        agency_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<KycModel>, Box<dyn Error + Send + Sync>> {
        let query = format!(
            "SELECT {KYC_COLUMNS} FROM kyc WHERE agency_id = $1 ORDER BY created_at DESC, id LIMIT $2 OFFSET $3"
        );
        let (total, rows) = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kyc WHERE agency_id = $1")
                .bind(agency_id)
                .fetch_one(&mut **transaction)
                .await?;
            let rows = sqlx::query(&query)
                .bind(agency_id)
                .bind(page.limit as i64)
                .bind(page.offset as i64)
                .fetch_all(&mut **transaction)
                .await?;
            (total, rows)
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(KycModel::try_from_row(&row)?);
        }
        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}

#[async_trait]
impl FindByAgencyId<KycModel> for KycRepositoryImpl {
    async fn find_by_agency_id(
        &self,
        agency_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<KycModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_agency_id_impl(self, agency_id, page).await
    }
}
