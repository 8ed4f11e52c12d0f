use std::error::Error;
use std::str::FromStr;

use kyc_review_api::{KycDetails, ReviewSections, ServiceKind};
use kyc_review_db::models::kyc::KycModel;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;

use crate::executor::Executor;
use crate::utils::TryFromRow;

pub struct KycRepositoryImpl {
    pub(crate) executor: Executor,
}

impl KycRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

pub(super) const KYC_COLUMNS: &str = "id, client_id, agency_id, kyc_type, status, services, details, review, created_at, updated_at, hash, audit_log_id";

pub(super) fn services_to_column(services: &[ServiceKind]) -> Vec<String> {
    services.iter().map(|service| service.as_str().to_string()).collect()
}

impl TryFromRow<PgRow> for KycModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let services: Vec<String> = row.try_get("services")?;
        let services = services
            .iter()
            .map(|service| ServiceKind::from_str(service))
            .collect::<Result<Vec<_>, _>>()?;
        let details: Json<KycDetails> = row.try_get("details")?;
        let review: Json<ReviewSections> = row.try_get("review")?;

        Ok(KycModel {
            id: row.try_get("id")?,
            client_id: row.try_get("client_id")?,
            agency_id: row.try_get("agency_id")?,
            kyc_type: row.try_get("kyc_type")?,
            status: row.try_get("status")?,
            services,
            details: details.0,
            review: review.0,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}
