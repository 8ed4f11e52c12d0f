use chrono::{DateTime, Utc};
use kyc_review_api::{CurrentUser, Role};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::audit::{AuditEntityType, AuditTracked};
use crate::models::identifiable::Identifiable;
use crate::models::scoped::AgencyScoped;

/// Staff member of an agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    pub fn to_current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.id,
            role: self.role,
            agency_id: self.agency_id,
        }
    }
}

impl Identifiable for UserModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl AgencyScoped for UserModel {
    fn agency_id(&self) -> Uuid {
        self.agency_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AuditTracked for UserModel {
    const ENTITY_TYPE: AuditEntityType = AuditEntityType::User;
}
