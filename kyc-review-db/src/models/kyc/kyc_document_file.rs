use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::audit::{AuditEntityType, AuditTracked};
use crate::models::scoped::KycScoped;

/// # Documentation
/// Association between a client document and a KYC record
///
/// Keyed by `(kyc_id, document_id)`. Removing a link never removes the
/// document itself; a document may be linked to any number of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct KycDocumentFileModel {
    pub kyc_id: Uuid,
    pub document_id: Uuid,
    pub linked_at: DateTime<Utc>,
}

impl KycDocumentFileModel {
    pub fn new(kyc_id: Uuid, document_id: Uuid) -> Self {
        Self {
            kyc_id,
            document_id,
            linked_at: Utc::now(),
        }
    }
}

impl KycScoped for KycDocumentFileModel {
    fn kyc_id(&self) -> Uuid {
        self.kyc_id
    }
}

impl AuditTracked for KycDocumentFileModel {
    const ENTITY_TYPE: AuditEntityType = AuditEntityType::KycDocumentFile;
}
