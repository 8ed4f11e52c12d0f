use async_trait::async_trait;
use kyc_review_db::models::audit::AuditLinkModel;
use kyc_review_db::repository::AuditLinkRepository;
use uuid::Uuid;

use crate::executor::Executor;

pub struct AuditLinkRepositoryImpl {
    pub(crate) executor: Executor,
}

impl AuditLinkRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl AuditLinkRepository for AuditLinkRepositoryImpl {
    async fn find_by_audit_log_id(
        &self,
        audit_log_id: Uuid,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self::find_by_audit_log_id_impl(self, audit_log_id).await?)
    }
}
