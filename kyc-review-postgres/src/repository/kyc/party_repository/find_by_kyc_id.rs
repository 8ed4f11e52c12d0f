use async_trait::async_trait;
use kyc_review_db::repository::FindByKycId;
use std::error::Error;
use uuid::Uuid;

use super::party_table::PartyTable;
use super::repo_impl::PartyRepositoryImpl;

impl<T: PartyTable> PartyRepositoryImpl<T> {
    pub(super) async fn find_by_kyc_id_impl(&self, kyc_id: Uuid) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        let sql = format!("{} WHERE kyc_id = $1 ORDER BY name, id", T::select_sql());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        Ok(sqlx::query_as::<_, T>(&sql).bind(kyc_id).fetch_all(&mut **transaction).await?)
    }
}

#[async_trait]
impl<T: PartyTable> FindByKycId<T> for PartyRepositoryImpl<T> {
    async fn find_by_kyc_id(&self, kyc_id: Uuid) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        self.find_by_kyc_id_impl(kyc_id).await
    }
}
