use chrono::{DateTime, Utc};
use kyc_review_api::KycType;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::audit::{AuditEntityType, AuditTracked};
use crate::models::identifiable::Identifiable;
use crate::models::scoped::AgencyScoped;

/// # Documentation
/// Database model for a client of an agency
///
/// `client_type` decides which subject variant the client's KYC forms carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ClientModel {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub client_type: KycType,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for ClientModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl AgencyScoped for ClientModel {
    fn agency_id(&self) -> Uuid {
        self.agency_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AuditTracked for ClientModel {
    const ENTITY_TYPE: AuditEntityType = AuditEntityType::Client;
}
