use async_trait::async_trait;
use kyc_review_db::models::kyc::KycModel;
use kyc_review_db::repository::Load;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::{KycRepositoryImpl, KYC_COLUMNS};
use crate::utils::TryFromRow;

impl KycRepositoryImpl {
    pub(super) async fn load_impl(repo: &KycRepositoryImpl, id: Uuid) -> Result<Option<KycModel>, Box<dyn Error + Send + Sync>> {
        let query = format!("SELECT {KYC_COLUMNS} FROM kyc WHERE id = $1");
        let row = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(&query).bind(id).fetch_optional(&mut **transaction).await?
        };

        row.map(|row| KycModel::try_from_row(&row)).transpose()
    }
}

#[async_trait]
impl Load<KycModel> for KycRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<KycModel>, Box<dyn Error + Send + Sync>> {
        Self::load_impl(self, id).await
    }
}
