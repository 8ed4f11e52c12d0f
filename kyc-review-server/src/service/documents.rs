use kyc_review_api::{ApiError, ApiResult, CurrentUser};
use kyc_review_db::models::kyc::KycModel;
use kyc_review_db::repository::{FindByClientId, FindByKycId, KycDocumentFileRepository};
use kyc_review_db::unit_of_work::ReviewRepositories;
use kyc_review_db::workflow::DocumentAvailability;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::{commit, load_kyc, open_audit_log, today, ReviewService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnlinkOutcome {
    /// False when no such link existed
    pub removed: bool,
}

/// Completed records keep their document links as signed.
fn ensure_open(kyc: &KycModel) -> ApiResult<()> {
    if kyc.status.is_terminal() {
        return Err(ApiError::InvalidState(format!("KYC record {} is completed", kyc.id)));
    }
    Ok(())
}

/// Projects the documents of the record's client as of today.
pub(crate) async fn project_availability(
    repositories: &ReviewRepositories,
    kyc: &KycModel,
) -> ApiResult<DocumentAvailability> {
    let documents = repositories
        .client_document_repository
        .find_by_client_id(kyc.client_id)
        .await?;
    let links = repositories.kyc_document_file_repository.find_by_kyc_id(kyc.id).await?;
    Ok(DocumentAvailability::project(documents, &links, today()))
}

impl ReviewService {
    pub async fn document_availability(&self, user: &CurrentUser, kyc_id: Uuid) -> ApiResult<DocumentAvailability> {
        let session = self.begin().await?;
        let repositories = session.repositories();
        let kyc = load_kyc(repositories, user, kyc_id).await?;
        project_availability(repositories, &kyc).await
    }

    /// Links one available document of the record's client and returns the
    /// new projection.
    pub async fn link_document(
        &self,
        user: &CurrentUser,
        kyc_id: Uuid,
        document_id: Uuid,
    ) -> ApiResult<DocumentAvailability> {
        let session = self.begin().await?;
        let repositories = session.repositories();
        let kyc = load_kyc(repositories, user, kyc_id).await?;
        ensure_open(&kyc)?;

        let projection = project_availability(repositories, &kyc).await?;
        if projection.linked.iter().any(|document| document.id == document_id) {
            return Err(ApiError::ValidationError(format!(
                "document {document_id} is already linked to KYC record {kyc_id}"
            )));
        }
        if !projection.is_available(document_id) {
            let owned = repositories
                .client_document_repository
                .find_by_client_id(kyc.client_id)
                .await?
                .iter()
                .any(|document| document.id == document_id);
            return Err(if owned {
                ApiError::ValidationError(format!("document {document_id} is expired or is a signature"))
            } else {
                ApiError::not_found("document", document_id)
            });
        }

        let audit_log_id = open_audit_log(repositories, user).await?;
        repositories
            .kyc_document_file_repository
            .link(kyc.id, document_id, audit_log_id)
            .await?;
        let projection = project_availability(repositories, &kyc).await?;

        commit(session).await?;
        info!(%kyc_id, %document_id, "Document linked");
        Ok(projection)
    }

    /// Removes the link between a document and a record. The document itself
    /// is kept; a missing link is not an error.
    pub async fn unlink_document(&self, user: &CurrentUser, kyc_id: Uuid, document_id: Uuid) -> ApiResult<UnlinkOutcome> {
        let session = self.begin().await?;
        let repositories = session.repositories();
        let kyc = load_kyc(repositories, user, kyc_id).await?;
        ensure_open(&kyc)?;

        let is_signature = repositories
            .client_document_repository
            .find_by_client_id(kyc.client_id)
            .await?
            .iter()
            .any(|document| document.id == document_id && document.is_signature);
        if is_signature {
            return Err(ApiError::ValidationError(format!(
                "signature document {document_id} cannot be unlinked"
            )));
        }

        let audit_log_id = open_audit_log(repositories, user).await?;
        let removed = repositories
            .kyc_document_file_repository
            .unlink(kyc.id, document_id, audit_log_id)
            .await?;
        if !removed {
            debug!(%kyc_id, %document_id, "Unlink of a missing link, nothing to do");
            return Ok(UnlinkOutcome { removed });
        }

        commit(session).await?;
        info!(%kyc_id, %document_id, "Document unlinked");
        Ok(UnlinkOutcome { removed })
    }
}
