use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - Struct to maintain an audit log
/// - One audit log per unit of work, all entities touched in the change set reference the same audit log.
/// - Created by the service that opens the unit of work, on behalf of the calling user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogModel {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by_user_id: Uuid,
}

impl AuditLogModel {
    pub fn new(updated_by_user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            updated_at: Utc::now(),
            updated_by_user_id,
        }
    }
}

impl Identifiable for AuditLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
