use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Entities owned by a tenant agency.
pub trait AgencyScoped {
    fn agency_id(&self) -> Uuid;

    /// Creation time, used for newest-first listings.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Entities attached to a single KYC record.
pub trait KycScoped {
    fn kyc_id(&self) -> Uuid;
}
