use async_trait::async_trait;
use kyc_review_db::models::client::ClientModel;
use kyc_review_db::repository::Load;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ClientRepositoryImpl;

#[async_trait]
impl Load<ClientModel> for ClientRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<ClientModel>, Box<dyn Error + Send + Sync>> {
        let query = sqlx::query_as::<_, ClientModel>(
            "SELECT id, agency_id, name, email, client_type, created_at FROM client WHERE id = $1",
        )
        .bind(id);

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        Ok(query.fetch_optional(&mut **transaction).await?)
    }
}
