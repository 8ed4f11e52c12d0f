use crate::models::audit::{AuditLinkModel, AuditLogModel};
use crate::models::client::{ClientDocumentModel, ClientModel};
use crate::models::kyc::{
    KycDocumentFileModel, KycModel, ManagementPersonModel, RelatedPersonModel, ShareholderModel, UboModel,
};
use crate::models::user::UserModel;

/// Every table of the in-memory backend. Rows keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub kyc: Vec<KycModel>,
    pub related_persons: Vec<RelatedPersonModel>,
    pub management_persons: Vec<ManagementPersonModel>,
    pub shareholders: Vec<ShareholderModel>,
    pub ubos: Vec<UboModel>,
    pub client_documents: Vec<ClientDocumentModel>,
    pub kyc_document_files: Vec<KycDocumentFileModel>,
    pub clients: Vec<ClientModel>,
    pub users: Vec<UserModel>,
    pub audit_logs: Vec<AuditLogModel>,
    pub audit_links: Vec<AuditLinkModel>,
}
