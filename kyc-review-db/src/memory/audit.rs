use std::error::Error;

use async_trait::async_trait;
use uuid::Uuid;

use super::repository::MemoryContext;
use crate::models::audit::{AuditLinkModel, AuditLogModel};
use crate::repository::{AuditLinkRepository, AuditLogRepository};

pub struct MemoryAuditRepository {
    ctx: MemoryContext,
}

impl MemoryAuditRepository {
    pub(crate) fn new(ctx: MemoryContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl AuditLogRepository for MemoryAuditRepository {
    async fn create(&self, audit_log: &AuditLogModel) -> Result<AuditLogModel, Box<dyn Error + Send + Sync>> {
        let mut state = self.ctx.state.lock();
        state.audit_logs.push(audit_log.clone());
        Ok(audit_log.clone())
    }

    async fn load(&self, id: Uuid) -> Result<Option<AuditLogModel>, Box<dyn Error + Send + Sync>> {
        let state = self.ctx.state.lock();
        Ok(state.audit_logs.iter().find(|log| log.id == id).cloned())
    }
}

#[async_trait]
impl AuditLinkRepository for MemoryAuditRepository {
    async fn find_by_audit_log_id(&self, audit_log_id: Uuid) -> Result<Vec<AuditLinkModel>, Box<dyn Error + Send + Sync>> {
        let state = self.ctx.state.lock();
        Ok(state
            .audit_links
            .iter()
            .filter(|link| link.audit_log_id == audit_log_id)
            .cloned()
            .collect())
    }
}
