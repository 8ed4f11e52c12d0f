use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::AuditEntityType;

/// # Documentation
/// - This struct is used to track all entities modified in a single unit of work.
/// - For document links the `entity_id` is the linked document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AuditLinkModel {
    pub audit_log_id: Uuid,
    pub entity_id: Uuid,
    pub entity_type: AuditEntityType,
}
