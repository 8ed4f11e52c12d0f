use std::error::Error;

use async_trait::async_trait;
use uuid::Uuid;

use super::repository::{record_audit_link, MemoryContext};
use super::state::MemoryState;
use crate::models::audit::{AuditEntityType, AuditTracked};
use crate::models::kyc::KycDocumentFileModel;
use crate::repository::{FindByKycId, KycDocumentFileRepository};

/// A link change is audited against both the document and the record.
fn record_link_audit(state: &mut MemoryState, audit_log_id: Uuid, kyc_id: Uuid, document_id: Uuid) {
    record_audit_link(state, audit_log_id, document_id, AuditEntityType::KycDocumentFile);
    record_audit_link(state, audit_log_id, kyc_id, AuditEntityType::Kyc);
}

pub struct MemoryKycDocumentFileRepository {
    ctx: MemoryContext,
}

impl MemoryKycDocumentFileRepository {
    pub(crate) fn new(ctx: MemoryContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl FindByKycId<KycDocumentFileModel> for MemoryKycDocumentFileRepository {
    async fn find_by_kyc_id(&self, kyc_id: Uuid) -> Result<Vec<KycDocumentFileModel>, Box<dyn Error + Send + Sync>> {
        let state = self.ctx.state.lock();
        Ok(state
            .kyc_document_files
            .iter()
            .filter(|link| link.kyc_id == kyc_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl KycDocumentFileRepository for MemoryKycDocumentFileRepository {
    async fn link(&self, kyc_id: Uuid, document_id: Uuid, audit_log_id: Uuid) -> Result<bool, Box<dyn Error + Send + Sync>> {
        self.ctx.check_writable(KycDocumentFileModel::ENTITY_TYPE)?;
        let mut state = self.ctx.state.lock();
        if state
            .kyc_document_files
            .iter()
            .any(|link| link.kyc_id == kyc_id && link.document_id == document_id)
        {
            return Ok(false);
        }
        state
            .kyc_document_files
            .push(KycDocumentFileModel::new(kyc_id, document_id));
        record_link_audit(&mut state, audit_log_id, kyc_id, document_id);
        Ok(true)
    }

    async fn unlink(&self, kyc_id: Uuid, document_id: Uuid, audit_log_id: Uuid) -> Result<bool, Box<dyn Error + Send + Sync>> {
        self.ctx.check_writable(KycDocumentFileModel::ENTITY_TYPE)?;
        let mut state = self.ctx.state.lock();
        let before = state.kyc_document_files.len();
        state
            .kyc_document_files
            .retain(|link| !(link.kyc_id == kyc_id && link.document_id == document_id));
        let removed = state.kyc_document_files.len() < before;
        if removed {
            record_link_audit(&mut state, audit_log_id, kyc_id, document_id);
        }
        Ok(removed)
    }
}
