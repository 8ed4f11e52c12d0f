use chrono::{DateTime, Utc};
use kyc_review_api::{KycDetails, KycStatus, KycType, ReviewSections, ServiceKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::audit::{AuditEntityType, AuditTracked};
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::models::scoped::AgencyScoped;
use crate::utils::hash_as_i64;

/// # Documentation
/// Database model for a submitted KYC form
///
/// - `client_id`, `agency_id` and `kyc_type` are fixed at creation
/// - `status` only advances, one step per review submission
/// - `services` is set at creation and never changed by the review workflow
/// - `details` carries the subject payload; its variant always matches `kyc_type`
/// - records are never deleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycModel {
    pub id: Uuid,

    /// Reference to the client the form describes
    pub client_id: Uuid,

    /// Tenant agency owning the record
    pub agency_id: Uuid,

    pub kyc_type: KycType,

    pub status: KycStatus,

    /// Requested services, never empty
    pub services: Vec<ServiceKind>,

    pub details: KycDetails,

    /// Review sections filled in by staff, one per stage
    pub review: ReviewSections,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Hash of the entity with hash field set to 0
    /// - 0: for new entities not yet created or not yet hashed
    /// - Non-zero: computed hash providing tamper detection
    ///
    /// Updates are only applied when the stored hash still equals the hash
    /// the caller loaded, which rejects interleaved submissions.
    pub hash: i64,

    /// Reference to the audit log of the last create/update
    pub audit_log_id: Option<Uuid>,
}

impl KycModel {
    pub fn new(client_id: Uuid, agency_id: Uuid, services: Vec<ServiceKind>, details: KycDetails) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            agency_id,
            kyc_type: details.kyc_type(),
            status: KycStatus::Submitted,
            services,
            details,
            review: ReviewSections::default(),
            created_at: now,
            updated_at: now,
            hash: 0,
            audit_log_id: None,
        }
    }

    /// Stamps the entity with `audit_log_id` and recomputes its hash.
    pub fn seal(&mut self, audit_log_id: Uuid) -> Result<(), String> {
        self.audit_log_id = Some(audit_log_id);
        self.hash = 0;
        self.hash = hash_as_i64(self)?;
        Ok(())
    }
}

impl Identifiable for KycModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for KycModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }
}

impl AgencyScoped for KycModel {
    fn agency_id(&self) -> Uuid {
        self.agency_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AuditTracked for KycModel {
    const ENTITY_TYPE: AuditEntityType = AuditEntityType::Kyc;
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_review_api::{Declarations, KycSubject, LegalEntityDetails};

    fn legal_kyc() -> KycModel {
        KycModel::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            vec![ServiceKind::Accounting],
            KycDetails {
                subject: KycSubject::Legal(LegalEntityDetails {
                    company_name: "Acme Holdings".to_string(),
                    ..Default::default()
                }),
                declarations: Declarations::default(),
            },
        )
    }

    #[test]
    fn test_new_record_starts_submitted() {
        let kyc = legal_kyc();
        assert_eq!(kyc.status, KycStatus::Submitted);
        assert_eq!(kyc.kyc_type, KycType::Legal);
        assert_eq!(kyc.hash, 0);
        assert!(kyc.audit_log_id.is_none());
    }

    #[test]
    fn test_seal_is_deterministic_and_content_sensitive() {
        let mut kyc = legal_kyc();
        let audit_log_id = Uuid::new_v4();
        kyc.seal(audit_log_id).unwrap();
        let first = kyc.hash;
        assert_ne!(first, 0);

        kyc.seal(audit_log_id).unwrap();
        assert_eq!(kyc.hash, first);

        kyc.status = KycStatus::ResponsibleReviewed;
        kyc.seal(audit_log_id).unwrap();
        assert_ne!(kyc.hash, first);
    }
}
