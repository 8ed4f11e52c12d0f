use async_trait::async_trait;
use kyc_review_db::models::user::UserModel;
use kyc_review_db::repository::Load;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::{UserRepositoryImpl, USER_SELECT};

#[async_trait]
impl Load<UserModel> for UserRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<UserModel>, Box<dyn Error + Send + Sync>> {
        let query = format!("{USER_SELECT} WHERE id = $1");
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        Ok(sqlx::query_as::<_, UserModel>(&query)
            .bind(id)
            .fetch_optional(&mut **transaction)
            .await?)
    }
}
