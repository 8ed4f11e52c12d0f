use async_trait::async_trait;
use kyc_review_db::models::audit::AuditLogModel;
use kyc_review_db::repository::AuditLogRepository;
use uuid::Uuid;

use crate::executor::Executor;

pub struct AuditLogRepositoryImpl {
    pub(crate) executor: Executor,
}

impl AuditLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl AuditLogRepository for AuditLogRepositoryImpl {
    async fn create(&self, audit_log: &AuditLogModel) -> Result<AuditLogModel, Box<dyn std::error::Error + Send + Sync>> {
        Self::create_impl(self, audit_log).await
    }

    async fn load(&self, id: Uuid) -> Result<Option<AuditLogModel>, Box<dyn std::error::Error + Send + Sync>> {
        Self::load_impl(self, id).await
    }
}
