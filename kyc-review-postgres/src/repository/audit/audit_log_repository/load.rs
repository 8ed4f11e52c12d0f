use kyc_review_db::models::audit::AuditLogModel;
use uuid::Uuid;

use super::repo_impl::AuditLogRepositoryImpl;

impl AuditLogRepositoryImpl {
    pub(super) async fn load_impl(
        repo: &AuditLogRepositoryImpl,
        id: Uuid,
    ) -> Result<Option<AuditLogModel>, Box<dyn std::error::Error + Send + Sync>> {
        let query = sqlx::query_as::<_, AuditLogModel>(
            r#"
            SELECT id, updated_at, updated_by_user_id
            FROM audit_log
            WHERE id = $1
            "#,
        )
        .bind(id);

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        Ok(query.fetch_optional(&mut **transaction).await?)
    }
}
