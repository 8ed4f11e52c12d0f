use kyc_review_db::models::audit::AuditLogModel;

use super::repo_impl::AuditLogRepositoryImpl;

impl AuditLogRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &AuditLogRepositoryImpl,
        audit_log: &AuditLogModel,
    ) -> Result<AuditLogModel, Box<dyn std::error::Error + Send + Sync>> {
        let query = sqlx::query(
            r#"
            INSERT INTO audit_log (id, updated_at, updated_by_user_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(audit_log.id)
        .bind(audit_log.updated_at)
        .bind(audit_log.updated_by_user_id);

        let mut tx = repo.executor.tx.lock().await;
        if let Some(transaction) = tx.as_mut() {
            query.execute(&mut **transaction).await?;
        } else {
            return Err("Transaction has been consumed".into());
        }

        Ok(audit_log.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use kyc_review_db::repository::AuditLogRepository;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing to a PostgreSQL instance"]
    async fn test_create_audit_log() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let audit_log_repo = &ctx.repos().audit_log_repository;

        let audit_log = create_test_audit_log();
        let created = audit_log_repo.create(&audit_log).await?;
        assert_eq!(created.id, audit_log.id);

        let loaded = audit_log_repo.load(audit_log.id).await?;
        assert_eq!(loaded.map(|log| log.updated_by_user_id), Some(audit_log.updated_by_user_id));

        Ok(())
    }
}
