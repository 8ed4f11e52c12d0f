//! Review services.
//!
//! Every mutating call opens one unit of work, writes one audit log on
//! behalf of the caller and commits once at the end. Returning early with an
//! error drops the session, which rolls every write back.

pub mod clients;
pub mod documents;
pub mod kyc;
pub mod parties;
pub mod submission;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

use std::error::Error;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use kyc_review_api::{ApiError, ApiResult, CurrentUser, FileStorage};
use kyc_review_db::models::audit::AuditLogModel;
use kyc_review_db::models::kyc::KycModel;
use kyc_review_db::repository::{is_concurrent_update, AuditLogRepository, Load};
use kyc_review_db::unit_of_work::{ReviewRepositories, UnitOfWork, UnitOfWorkSession};
use uuid::Uuid;

pub use documents::UnlinkOutcome;
pub use parties::ReconcileSummary;
pub use submission::{PartyChanges, SubmissionOutcome};

pub struct ReviewService {
    uow: Arc<dyn UnitOfWork>,
    storage: Arc<dyn FileStorage>,
}

impl ReviewService {
    pub fn new(uow: Arc<dyn UnitOfWork>, storage: Arc<dyn FileStorage>) -> Self {
        Self { uow, storage }
    }

    async fn begin(&self) -> ApiResult<Box<dyn UnitOfWorkSession>> {
        Ok(self.uow.begin().await?)
    }
}

async fn commit(session: Box<dyn UnitOfWorkSession>) -> ApiResult<()> {
    session.commit().await.map_err(map_write_error)
}

/// Writes the audit log shared by every entity the unit of work touches.
async fn open_audit_log(repositories: &ReviewRepositories, user: &CurrentUser) -> ApiResult<Uuid> {
    let audit_log = repositories
        .audit_log_repository
        .create(&AuditLogModel::new(user.id))
        .await?;
    Ok(audit_log.id)
}

/// Loads a KYC record of the caller's agency. Records of other agencies are
/// reported as missing.
async fn load_kyc(repositories: &ReviewRepositories, user: &CurrentUser, kyc_id: Uuid) -> ApiResult<KycModel> {
    match repositories.kyc_repository.load(kyc_id).await? {
        Some(kyc) if kyc.agency_id == user.agency_id => Ok(kyc),
        _ => Err(ApiError::not_found("KYC record", kyc_id)),
    }
}

/// Stale optimistic-concurrency hashes become conflicts; anything else is a
/// database failure.
fn map_write_error(error: Box<dyn Error + Send + Sync>) -> ApiError {
    if is_concurrent_update(error.as_ref()) {
        ApiError::Conflict(error.to_string())
    } else {
        ApiError::DatabaseError(error.to_string())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_review_db::models::audit::AuditEntityType;
    use kyc_review_db::repository::ConcurrentUpdateError;

    #[test]
    fn test_concurrent_update_maps_to_conflict() {
        let error: Box<dyn Error + Send + Sync> = Box::new(ConcurrentUpdateError {
            entity_type: AuditEntityType::Kyc,
            id: Uuid::new_v4(),
        });
        assert!(matches!(map_write_error(error), ApiError::Conflict(_)));

        let error: Box<dyn Error + Send + Sync> = "connection reset".into();
        assert!(matches!(map_write_error(error), ApiError::DatabaseError(_)));
    }
}
