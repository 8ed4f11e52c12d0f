use async_trait::async_trait;
use kyc_review_db::models::user::UserModel;
use kyc_review_db::repository::FindByEmail;
use std::error::Error;

use super::repo_impl::{UserRepositoryImpl, USER_SELECT};

#[async_trait]
impl FindByEmail for UserRepositoryImpl {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, Box<dyn Error + Send + Sync>> {
        let query = format!("{USER_SELECT} WHERE LOWER(email) = LOWER($1)");
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        Ok(sqlx::query_as::<_, UserModel>(&query)
            .bind(email)
            .fetch_optional(&mut **transaction)
            .await?)
    }
}
