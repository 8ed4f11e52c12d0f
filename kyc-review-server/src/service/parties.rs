use kyc_review_api::{ApiError, ApiResult, CurrentUser, PartyCollectionRequest};
use kyc_review_db::models::identifiable::Identifiable;
use kyc_review_db::models::kyc::PartyModel;
use kyc_review_db::repository::{CreateBatch, DeleteBatch, FindByKycId, UpdateBatch};
use kyc_review_db::unit_of_work::ReviewRepositories;
use kyc_review_db::workflow::{plan_reconciliation, Reconciliation};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::{commit, load_kyc, map_write_error, open_audit_log, ReviewService};

/// Counts of one applied reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    /// The incoming collection held only placeholders
    pub skipped: bool,
}

/// Plans the reconciliation of `incoming` against the stored collection.
pub(crate) async fn plan_collection<T: PartyModel>(
    repositories: &ReviewRepositories,
    kyc_id: Uuid,
    incoming: Vec<T::Input>,
) -> ApiResult<Reconciliation<T::Input>> {
    let existing_ids: Vec<Uuid> = T::repository(repositories)
        .find_by_kyc_id(kyc_id)
        .await?
        .iter()
        .map(Identifiable::get_id)
        .collect();
    plan_reconciliation(&existing_ids, incoming).map_err(|e| ApiError::ValidationError(e.to_string()))
}

/// Executes a planned reconciliation inside the caller's unit of work.
pub(crate) async fn apply_collection<T: PartyModel>(
    repositories: &ReviewRepositories,
    kyc_id: Uuid,
    reconciliation: Reconciliation<T::Input>,
    audit_log_id: Uuid,
) -> ApiResult<ReconcileSummary> {
    let plan = match reconciliation {
        Reconciliation::Skip => {
            debug!(%kyc_id, collection = ?T::ENTITY_TYPE, "Placeholder-only collection, left untouched");
            return Ok(ReconcileSummary {
                skipped: true,
                ..Default::default()
            });
        }
        Reconciliation::Apply(plan) => plan,
    };

    let repository = T::repository(repositories);
    let summary = ReconcileSummary {
        inserted: plan.inserts.len(),
        updated: plan.updates.len(),
        deleted: plan.deletes.len(),
        skipped: false,
    };

    if !plan.deletes.is_empty() {
        repository.delete_batch(&plan.deletes, audit_log_id).await?;
    }
    if !plan.updates.is_empty() {
        let rows = plan
            .updates
            .into_iter()
            .map(|(id, input)| T::from_input(id, kyc_id, input))
            .collect();
        repository.update_batch(rows, audit_log_id).await.map_err(map_write_error)?;
    }
    if !plan.inserts.is_empty() {
        let rows = plan
            .inserts
            .into_iter()
            .map(|input| T::from_input(Uuid::new_v4(), kyc_id, input))
            .collect();
        repository.create_batch(rows, audit_log_id).await?;
    }

    debug!(
        %kyc_id,
        collection = ?T::ENTITY_TYPE,
        inserted = summary.inserted,
        updated = summary.updated,
        deleted = summary.deleted,
        "Collection reconciled"
    );
    Ok(summary)
}

impl ReviewService {
    pub async fn list_parties<T: PartyModel>(&self, user: &CurrentUser, kyc_id: Uuid) -> ApiResult<Vec<T>> {
        let session = self.begin().await?;
        let repositories = session.repositories();
        load_kyc(repositories, user, kyc_id).await?;
        Ok(T::repository(repositories).find_by_kyc_id(kyc_id).await?)
    }

    /// Replaces one party collection of a record with the incoming rows and
    /// returns the stored collection.
    pub async fn reconcile_parties<T>(
        &self,
        user: &CurrentUser,
        request: PartyCollectionRequest<T::Input>,
    ) -> ApiResult<Vec<T>>
    where
        T: PartyModel,
        T::Input: Validate,
    {
        request.validate()?;

        let session = self.begin().await?;
        let repositories = session.repositories();
        let kyc = load_kyc(repositories, user, request.kyc_id).await?;
        if kyc.status.is_terminal() {
            return Err(ApiError::InvalidState(format!("KYC record {} is completed", kyc.id)));
        }

        let reconciliation = plan_collection::<T>(repositories, kyc.id, request.items).await?;
        if matches!(reconciliation, Reconciliation::Skip) {
            debug!(kyc_id = %kyc.id, collection = ?T::ENTITY_TYPE, "Placeholder-only collection, left untouched");
            return Ok(T::repository(repositories).find_by_kyc_id(kyc.id).await?);
        }

        let audit_log_id = open_audit_log(repositories, user).await?;
        let summary = apply_collection::<T>(repositories, kyc.id, reconciliation, audit_log_id).await?;
        let stored = T::repository(repositories).find_by_kyc_id(kyc.id).await?;

        commit(session).await?;
        info!(
            kyc_id = %kyc.id,
            collection = ?T::ENTITY_TYPE,
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            "Party collection replaced"
        );
        Ok(stored)
    }
}
