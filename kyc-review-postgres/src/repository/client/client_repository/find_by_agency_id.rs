use async_trait::async_trait;
use kyc_review_db::models::client::ClientModel;
use kyc_review_db::repository::{FindByAgencyId, Page, PageRequest};
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ClientRepositoryImpl;

#[async_trait]
impl FindByAgencyId<ClientModel> for ClientRepositoryImpl {
    async fn find_by_agency_id(
        &self,
        agency_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<ClientModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM client WHERE agency_id = $1")
            .bind(agency_id)
            .fetch_one(&mut **transaction)
            .await?;
        let items = sqlx::query_as::<_, ClientModel>(
            r#"
            SELECT id, agency_id, name, email, client_type, created_at
            FROM client
            WHERE agency_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(agency_id)
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(&mut **transaction)
        .await?;

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}
