use chrono::{DateTime, NaiveDate, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::{AuditEntityType, AuditTracked};
use crate::models::identifiable::Identifiable;

/// # Documentation
/// Database model for a document uploaded for a client
///
/// The file itself lives with the hosted storage provider; this row keeps
/// its public URL and metadata. Signature images captured during review are
/// stored here as well, flagged with `is_signature`.
///
/// A document is available for linking while `expires_at` is unset or not
/// before the current UTC day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDocumentModel {
    pub id: Uuid,

    /// Reference to the owning client
    pub client_id: Uuid,

    pub name: String,

    /// Public URL returned by the storage provider
    pub url: String,

    /// MIME type, e.g. `image/png`
    pub content_type: HeaplessString<100>,

    /// Size in bytes
    pub size: i64,

    pub expires_at: Option<DateTime<Utc>>,

    pub is_signature: bool,

    pub created_at: DateTime<Utc>,
}

impl ClientDocumentModel {
    /// Whether the document may still be linked on `today`.
    pub fn is_available_on(&self, today: NaiveDate) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => expires_at.date_naive() >= today,
        }
    }
}

impl Identifiable for ClientDocumentModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl AuditTracked for ClientDocumentModel {
    const ENTITY_TYPE: AuditEntityType = AuditEntityType::ClientDocument;
}
