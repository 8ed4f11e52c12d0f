use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "audit_entity_type", rename_all = "PascalCase")]
pub enum AuditEntityType {
    Kyc,
    RelatedPerson,
    ManagementPerson,
    Shareholder,
    Ubo,
    ClientDocument,
    KycDocumentFile,
    Client,
    User,
}

impl From<AuditEntityType> for &str {
    fn from(val: AuditEntityType) -> Self {
        match val {
            AuditEntityType::Kyc => "Kyc",
            AuditEntityType::RelatedPerson => "RelatedPerson",
            AuditEntityType::ManagementPerson => "ManagementPerson",
            AuditEntityType::Shareholder => "Shareholder",
            AuditEntityType::Ubo => "Ubo",
            AuditEntityType::ClientDocument => "ClientDocument",
            AuditEntityType::KycDocumentFile => "KycDocumentFile",
            AuditEntityType::Client => "Client",
            AuditEntityType::User => "User",
        }
    }
}

/// Entities whose mutations are recorded in `audit_link`.
pub trait AuditTracked {
    const ENTITY_TYPE: AuditEntityType;
}
