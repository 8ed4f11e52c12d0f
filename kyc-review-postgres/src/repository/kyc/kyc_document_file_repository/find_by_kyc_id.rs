use async_trait::async_trait;
use kyc_review_db::models::kyc::KycDocumentFileModel;
use kyc_review_db::repository::FindByKycId;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::KycDocumentFileRepositoryImpl;

#[async_trait]
impl FindByKycId<KycDocumentFileModel> for KycDocumentFileRepositoryImpl {
    async fn find_by_kyc_id(&self, kyc_id: Uuid) -> Result<Vec<KycDocumentFileModel>, Box<dyn Error + Send + Sync>> {
        let query = sqlx::query_as::<_, KycDocumentFileModel>(
            r#"
            SELECT kyc_id, document_id, linked_at
            FROM kyc_document_file
            WHERE kyc_id = $1
            ORDER BY linked_at
            "#,
        )
        .bind(kyc_id);

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        Ok(query.fetch_all(&mut **transaction).await?)
    }
}
