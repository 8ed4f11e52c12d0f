use async_trait::async_trait;
use kyc_review_db::models::audit::AuditTracked;
use kyc_review_db::models::user::UserModel;
use kyc_review_db::repository::CreateBatch;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::UserRepositoryImpl;
use crate::repository::audit::insert_audit_links;

#[async_trait]
impl CreateBatch<UserModel> for UserRepositoryImpl {
    async fn create_batch(&self, items: Vec<UserModel>, audit_log_id: Uuid) -> Result<Vec<UserModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO app_user (id, agency_id, email, name, role, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.id)
            .bind(item.agency_id)
            .bind(item.email.as_str())
            .bind(item.name.as_str())
            .bind(item.role)
            .bind(item.created_at)
            .execute(&mut **transaction)
            .await?;
        }

        let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
        insert_audit_links(&mut **transaction, audit_log_id, UserModel::ENTITY_TYPE, &ids).await?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{create_test_audit_log, create_test_user, setup_test_context};
    use kyc_review_api::Role;
    use kyc_review_db::repository::{AuditLogRepository, CreateBatch, DeleteBatch, FindByEmail, Load};

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL instance"]
    async fn test_user_lifecycle() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;

        let user = create_test_user(Role::Staff);
        repos.user_repository.create_batch(vec![user.clone()], audit_log.id).await?;

        let by_email = repos.user_repository.find_by_email(&user.email.to_uppercase()).await?;
        assert_eq!(by_email.map(|u| u.id), Some(user.id));

        assert_eq!(repos.user_repository.delete_batch(&[user.id], audit_log.id).await?, 1);
        assert!(repos.user_repository.load(user.id).await?.is_none());
        assert_eq!(repos.user_repository.delete_batch(&[user.id], audit_log.id).await?, 0);

        Ok(())
    }
}
