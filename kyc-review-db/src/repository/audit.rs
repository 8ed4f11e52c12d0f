use async_trait::async_trait;
use uuid::Uuid;

use crate::models::audit::{AuditLinkModel, AuditLogModel};

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn create(&self, audit_log: &AuditLogModel) -> Result<AuditLogModel, Box<dyn std::error::Error + Send + Sync>>;

    async fn load(&self, id: Uuid) -> Result<Option<AuditLogModel>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Read access to the audit links written by the other repositories.
#[async_trait]
pub trait AuditLinkRepository: Send + Sync {
    async fn find_by_audit_log_id(
        &self,
        audit_log_id: Uuid,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn std::error::Error + Send + Sync>>;
}
