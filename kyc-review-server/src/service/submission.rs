//! Review submission.
//!
//! One submission advances a KYC record by exactly one stage:
//!
//! 1. compute the next status and the signer label, and check the edits,
//!    the selected documents and the party collections
//! 2. upload the signature image
//! 3. store the upload as a signature document
//! 4. save the edits together with the next status
//! 5. link the signature document and every selected document
//! 6. reconcile each supplied party collection
//! 7. commit
//!
//! Step 1 runs in a session that is dropped before the upload, so no
//! database session is held while the storage provider responds. Steps 3
//! to 7 share a second unit of work that repeats the checks of step 1 and
//! refuses the submission if the record changed in between. Any failure
//! drops that session, so no row survives a failed submission. The upload
//! cannot be undone; a failure after it leaves an orphaned file with the
//! storage provider.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};
use kyc_review_api::{
    ApiError, ApiResult, CurrentUser, ManagementPersonInput, RelatedPersonInput, ShareholderInput, StatusTransition,
    StoredFile, SubmitReviewRequest, UboInput,
};
use kyc_review_db::models::client::ClientDocumentModel;
use kyc_review_db::models::kyc::{KycModel, ManagementPersonModel, RelatedPersonModel, ShareholderModel, UboModel};
use kyc_review_db::repository::{CreateBatch, KycDocumentFileRepository, UpdateBatch};
use kyc_review_db::unit_of_work::ReviewRepositories;
use kyc_review_db::utils::to_heapless;
use kyc_review_db::workflow::Reconciliation;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::documents::project_availability;
use super::kyc::apply_edits;
use super::parties::{apply_collection, plan_collection, ReconcileSummary};
use super::{commit, load_kyc, map_write_error, open_audit_log, ReviewService};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";
const SIGNATURE_CONTENT_TYPE: &str = "image/png";

/// Counts per party collection; `None` for collections not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartyChanges {
    pub related_persons: Option<ReconcileSummary>,
    pub management_persons: Option<ReconcileSummary>,
    pub shareholders: Option<ReconcileSummary>,
    pub ubos: Option<ReconcileSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    pub kyc: KycModel,
    pub signer_label: &'static str,
    pub signature_document: ClientDocumentModel,
    /// Selected documents linked by this submission
    pub linked_document_ids: Vec<Uuid>,
    pub parties: PartyChanges,
}

/// Reconciliations planned before anything is written.
struct PlannedParties {
    related_persons: Option<Reconciliation<RelatedPersonInput>>,
    management_persons: Option<Reconciliation<ManagementPersonInput>>,
    shareholders: Option<Reconciliation<ShareholderInput>>,
    ubos: Option<Reconciliation<UboInput>>,
}

/// Expiry of signature documents; signatures never expire.
pub fn signature_expiry() -> ApiResult<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ApiError::InternalError("invalid signature expiry".to_string()))
}

/// Decodes a PNG signature given as a data URL or as bare base64.
pub fn decode_signature(signature: &str) -> ApiResult<Vec<u8>> {
    let signature = signature.trim();
    let encoded = if let Some(encoded) = signature.strip_prefix(PNG_DATA_URL_PREFIX) {
        encoded
    } else if signature.starts_with("data:") {
        return Err(ApiError::ValidationError("signature must be a PNG data URL".to_string()));
    } else {
        signature
    };

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| ApiError::ValidationError(format!("signature is not valid base64: {e}")))?;
    if !bytes.starts_with(&PNG_MAGIC) {
        return Err(ApiError::ValidationError("signature is not a PNG image".to_string()));
    }
    Ok(bytes)
}

async fn plan_parties(
    repositories: &ReviewRepositories,
    kyc_id: Uuid,
    request: &mut SubmitReviewRequest,
) -> ApiResult<PlannedParties> {
    let related_persons = match request.related_persons.take() {
        Some(items) => Some(plan_collection::<RelatedPersonModel>(repositories, kyc_id, items).await?),
        None => None,
    };
    let management_persons = match request.management_persons.take() {
        Some(items) => Some(plan_collection::<ManagementPersonModel>(repositories, kyc_id, items).await?),
        None => None,
    };
    let shareholders = match request.shareholders.take() {
        Some(items) => Some(plan_collection::<ShareholderModel>(repositories, kyc_id, items).await?),
        None => None,
    };
    let ubos = match request.ubos.take() {
        Some(items) => Some(plan_collection::<UboModel>(repositories, kyc_id, items).await?),
        None => None,
    };
    Ok(PlannedParties {
        related_persons,
        management_persons,
        shareholders,
        ubos,
    })
}

async fn apply_parties(
    repositories: &ReviewRepositories,
    kyc_id: Uuid,
    planned: PlannedParties,
    audit_log_id: Uuid,
) -> ApiResult<PartyChanges> {
    let mut changes = PartyChanges::default();
    if let Some(plan) = planned.related_persons {
        changes.related_persons =
            Some(apply_collection::<RelatedPersonModel>(repositories, kyc_id, plan, audit_log_id).await?);
    }
    if let Some(plan) = planned.management_persons {
        changes.management_persons =
            Some(apply_collection::<ManagementPersonModel>(repositories, kyc_id, plan, audit_log_id).await?);
    }
    if let Some(plan) = planned.shareholders {
        changes.shareholders = Some(apply_collection::<ShareholderModel>(repositories, kyc_id, plan, audit_log_id).await?);
    }
    if let Some(plan) = planned.ubos {
        changes.ubos = Some(apply_collection::<UboModel>(repositories, kyc_id, plan, audit_log_id).await?);
    }
    Ok(changes)
}

/// Keeps the first occurrence of every id.
fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// A submission checked against the stored record, ready to be written.
struct PreparedSubmission {
    kyc: KycModel,
    /// Hash of the record as loaded, before the edits were applied
    loaded_hash: i64,
    transition: StatusTransition,
    signer_label: &'static str,
    selected: Vec<Uuid>,
    planned: PlannedParties,
}

/// Loads the record and checks everything a submission would write.
async fn prepare(
    repositories: &ReviewRepositories,
    user: &CurrentUser,
    kyc_id: Uuid,
    mut request: SubmitReviewRequest,
) -> ApiResult<PreparedSubmission> {
    let mut kyc = load_kyc(repositories, user, kyc_id).await?;
    let loaded_hash = kyc.hash;

    let transition = kyc.status.transition();
    let signer_label = match transition.signer_label {
        Some(label) if transition.advances() => label,
        _ => {
            warn!(%kyc_id, status = %kyc.status, "Submission rejected for a completed record");
            return Err(ApiError::InvalidState(format!("KYC record {kyc_id} is already completed")));
        }
    };

    apply_edits(&mut kyc, request.details.take(), request.review.take())?;

    let selected = dedup_ids(&request.document_ids);
    let availability = project_availability(repositories, &kyc).await?;
    if let Some(unavailable) = selected.iter().find(|id| !availability.is_available(**id)) {
        return Err(ApiError::ValidationError(format!(
            "document {unavailable} is not available for KYC record {kyc_id}"
        )));
    }

    let planned = plan_parties(repositories, kyc.id, &mut request).await?;
    Ok(PreparedSubmission {
        kyc,
        loaded_hash,
        transition,
        signer_label,
        selected,
        planned,
    })
}

impl ReviewService {
    /// Advances a record by one stage with the caller's signature.
    pub async fn submit_review(
        &self,
        user: &CurrentUser,
        kyc_id: Uuid,
        request: SubmitReviewRequest,
    ) -> ApiResult<SubmissionOutcome> {
        request.validate()?;
        let signature_bytes = decode_signature(&request.signature)?;

        let (loaded_hash, transition) = {
            let session = self.begin().await?;
            let checked = prepare(session.repositories(), user, kyc_id, request.clone()).await?;
            (checked.loaded_hash, checked.transition)
        };

        let file_name = format!("signature-{}-{}.png", kyc_id, transition.to);
        let stored = self
            .storage
            .upload(signature_bytes, SIGNATURE_CONTENT_TYPE, &file_name)
            .await?;

        let result = async {
            let session = self.begin().await?;
            let outcome = write_submission(session.repositories(), user, kyc_id, request, loaded_hash, &stored).await?;
            commit(session).await?;
            Ok::<_, ApiError>(outcome)
        }
        .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%kyc_id, url = %stored.url, error = %error, "Submission rolled back, uploaded signature is orphaned");
                return Err(error);
            }
        };

        info!(
            %kyc_id,
            from = %transition.from,
            to = %transition.to,
            signer = outcome.signer_label,
            linked = outcome.linked_document_ids.len(),
            "KYC review submitted"
        );
        Ok(outcome)
    }
}

/// Repeats the checks of [`prepare`] and writes the submission.
async fn write_submission(
    repositories: &ReviewRepositories,
    user: &CurrentUser,
    kyc_id: Uuid,
    request: SubmitReviewRequest,
    loaded_hash: i64,
    stored: &StoredFile,
) -> ApiResult<SubmissionOutcome> {
    let PreparedSubmission {
        mut kyc,
        loaded_hash: current_hash,
        transition,
        signer_label,
        selected,
        planned,
    } = prepare(repositories, user, kyc_id, request).await?;
    if current_hash != loaded_hash {
        return Err(ApiError::Conflict(format!(
            "KYC record {kyc_id} changed while the signature was uploading"
        )));
    }

    let audit_log_id = open_audit_log(repositories, user).await?;
    let signature_document = insert_signature(repositories, &kyc, signer_label, stored, audit_log_id).await?;

    kyc.status = transition.to;
    kyc.updated_at = Utc::now();
    let mut saved = repositories
        .kyc_repository
        .update_batch(vec![kyc], audit_log_id)
        .await
        .map_err(map_write_error)?;
    let kyc = saved
        .pop()
        .ok_or_else(|| ApiError::InternalError("KYC record was not saved".to_string()))?;

    let links = &repositories.kyc_document_file_repository;
    links.link(kyc.id, signature_document.id, audit_log_id).await?;
    for document_id in &selected {
        links.link(kyc.id, *document_id, audit_log_id).await?;
    }

    let parties = apply_parties(repositories, kyc.id, planned, audit_log_id).await?;

    Ok(SubmissionOutcome {
        kyc,
        signer_label,
        signature_document,
        linked_document_ids: selected,
        parties,
    })
}

async fn insert_signature(
    repositories: &ReviewRepositories,
    kyc: &KycModel,
    signer_label: &str,
    stored: &StoredFile,
    audit_log_id: Uuid,
) -> ApiResult<ClientDocumentModel> {
    let document = ClientDocumentModel {
        id: Uuid::new_v4(),
        client_id: kyc.client_id,
        name: signer_label.to_string(),
        url: stored.url.clone(),
        content_type: to_heapless("content_type", &stored.content_type).map_err(ApiError::ValidationError)?,
        size: stored.size,
        expires_at: Some(signature_expiry()?),
        is_signature: true,
        created_at: Utc::now(),
    };
    let mut saved = repositories
        .client_document_repository
        .create_batch(vec![document], audit_log_id)
        .await?;
    saved
        .pop()
        .ok_or_else(|| ApiError::InternalError("signature document was not saved".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration};
    use kyc_review_api::{KycStatus, ResponsibleReview, ReviewSectionEdit, RiskLevel};
    use kyc_review_db::models::audit::AuditEntityType;

    use crate::service::test_support::{signature, Fixture};
    use crate::storage::MemoryFileStorage;
    use async_trait::async_trait;
    use kyc_review_api::FileStorage;
    use kyc_review_db::memory::MemoryUnitOfWork;
    use kyc_review_db::models::audit::AuditLogModel;
    use kyc_review_db::repository::{AuditLogRepository, Load};
    use kyc_review_db::unit_of_work::UnitOfWork;
    use std::sync::Arc;

    /// Storage that opens its own database session while an upload is in
    /// flight, optionally saving a KYC record on behalf of another user.
    struct InterleavingStorage {
        uow: MemoryUnitOfWork,
        inner: MemoryFileStorage,
        touch: Option<(Uuid, Uuid)>,
    }

    #[async_trait]
    impl FileStorage for InterleavingStorage {
        async fn upload(&self, bytes: Vec<u8>, content_type: &str, file_name: &str) -> ApiResult<StoredFile> {
            let session = tokio::time::timeout(std::time::Duration::from_secs(2), self.uow.begin())
                .await
                .map_err(|_| ApiError::InternalError("a database session is held during the upload".to_string()))?
                .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
            if let Some((kyc_id, user_id)) = self.touch {
                let repositories = session.repositories();
                let audit_log = repositories.audit_log_repository.create(&AuditLogModel::new(user_id)).await?;
                let kyc = repositories.kyc_repository.load(kyc_id).await?.unwrap();
                repositories.kyc_repository.update_batch(vec![kyc], audit_log.id).await?;
                session.commit().await?;
            } else {
                drop(session);
            }
            self.inner.upload(bytes, content_type, file_name).await
        }
    }

    fn interleaving_service(fixture: &Fixture, touch: Option<(Uuid, Uuid)>) -> (ReviewService, Arc<InterleavingStorage>) {
        let storage = Arc::new(InterleavingStorage {
            uow: fixture.uow.clone(),
            inner: MemoryFileStorage::default(),
            touch,
        });
        (ReviewService::new(Arc::new(fixture.uow.clone()), storage.clone()), storage)
    }

    fn person(name: &str) -> RelatedPersonInput {
        RelatedPersonInput {
            id: None,
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(dedup_ids(&[b, a, b, c, a]), vec![b, a, c]);
        assert!(dedup_ids(&[]).is_empty());
    }

    #[test]
    fn test_decode_signature_formats() {
        let png = signature();
        let bare = png.trim_start_matches(PNG_DATA_URL_PREFIX);
        assert_eq!(decode_signature(&png).unwrap(), decode_signature(bare).unwrap());

        let jpeg = format!("data:image/jpeg;base64,{bare}");
        assert!(matches!(decode_signature(&jpeg), Err(ApiError::ValidationError(_))));
        assert!(matches!(decode_signature("not base64!"), Err(ApiError::ValidationError(_))));
        assert!(matches!(
            decode_signature(&STANDARD.encode(b"GIF89a")),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn test_signature_never_expires() {
        let expiry = signature_expiry().unwrap();
        assert_eq!((expiry.year(), expiry.month(), expiry.day()), (9999, 12, 31));
    }

    #[tokio::test]
    async fn test_first_review_links_documents_and_adds_party() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.submitted_kyc(&client).await;
        let first = fixture.document(client.id, None).await;
        let second = fixture.document(client.id, Some(Utc::now() + Duration::days(10))).await;

        let outcome = fixture
            .service
            .submit_review(
                &fixture.staff,
                kyc.id,
                SubmitReviewRequest {
                    review: Some(ReviewSectionEdit::Responsible(ResponsibleReview {
                        risk_level: Some(RiskLevel::Medium),
                        identity_verified: true,
                        ..Default::default()
                    })),
                    signature: signature(),
                    document_ids: vec![first.id, second.id],
                    related_persons: Some(vec![person("Jane Roe")]),
                    ..Default::default()
                },
            )
            .await?;

        assert_eq!(outcome.kyc.status, KycStatus::ResponsibleReviewed);
        assert_eq!(outcome.signer_label, "responsible signature");
        assert!(outcome.signature_document.is_signature);
        assert_eq!(outcome.signature_document.expires_at, Some(signature_expiry()?));
        assert_eq!(outcome.parties.related_persons.unwrap().inserted, 1);
        assert!(outcome.parties.ubos.is_none());

        let state = fixture.uow.snapshot().await;
        let links: Vec<Uuid> = state
            .kyc_document_files
            .iter()
            .filter(|link| link.kyc_id == kyc.id)
            .map(|link| link.document_id)
            .collect();
        assert_eq!(links.len(), 3);
        assert!(links.contains(&outcome.signature_document.id));
        assert!(links.contains(&first.id) && links.contains(&second.id));

        assert_eq!(state.related_persons.len(), 1);
        assert_eq!(state.related_persons[0].name, "Jane Roe");
        assert_eq!(state.related_persons[0].kyc_id, kyc.id);

        // All writes share the audit log of the submission.
        let audit_log_id = outcome.kyc.audit_log_id.unwrap();
        let touched: Vec<AuditEntityType> = state
            .audit_links
            .iter()
            .filter(|link| link.audit_log_id == audit_log_id)
            .map(|link| link.entity_type)
            .collect();
        assert!(touched.contains(&AuditEntityType::ClientDocument));
        assert!(touched.contains(&AuditEntityType::Kyc));
        assert!(touched.contains(&AuditEntityType::RelatedPerson));
        assert_eq!(touched.iter().filter(|t| **t == AuditEntityType::KycDocumentFile).count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_stages_advance_in_order() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.submitted_kyc(&client).await;

        let mut labels = Vec::new();
        for expected in [
            KycStatus::ResponsibleReviewed,
            KycStatus::ComplianceReviewed,
            KycStatus::Completed,
        ] {
            let outcome = fixture
                .service
                .submit_review(
                    &fixture.staff,
                    kyc.id,
                    SubmitReviewRequest {
                        signature: signature(),
                        ..Default::default()
                    },
                )
                .await?;
            assert_eq!(outcome.kyc.status, expected);
            labels.push(outcome.signer_label);
        }
        assert_eq!(
            labels,
            vec!["responsible signature", "compliance signature", "oversight-committee signature"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_completed_record_is_rejected_before_any_write() {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.completed_kyc(&client).await;
        let before = fixture.uow.snapshot().await;
        let files_before = fixture.storage.file_count();

        let error = fixture
            .service
            .submit_review(
                &fixture.staff,
                kyc.id,
                SubmitReviewRequest {
                    signature: signature(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::InvalidState(_)));

        let after = fixture.uow.snapshot().await;
        assert_eq!(after.kyc, before.kyc);
        assert_eq!(after.kyc[0].status, KycStatus::Completed);
        assert_eq!(after.client_documents.len(), before.client_documents.len());
        assert_eq!(fixture.storage.file_count(), files_before);
    }

    #[tokio::test]
    async fn test_failure_rolls_back_every_write() {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.submitted_kyc(&client).await;
        let document = fixture.document(client.id, None).await;
        let before = fixture.uow.snapshot().await;

        fixture.uow.inject_failure(Some(AuditEntityType::RelatedPerson));
        let error = fixture
            .service
            .submit_review(
                &fixture.staff,
                kyc.id,
                SubmitReviewRequest {
                    signature: signature(),
                    document_ids: vec![document.id],
                    related_persons: Some(vec![person("Jane Roe")]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::DatabaseError(_)));

        let after = fixture.uow.snapshot().await;
        assert_eq!(after.kyc, before.kyc);
        assert_eq!(after.client_documents, before.client_documents);
        assert!(after.kyc_document_files.is_empty());
        assert!(after.related_persons.is_empty());
        assert_eq!(after.audit_logs.len(), before.audit_logs.len());
        // The signature upload itself cannot be undone.
        assert_eq!(fixture.storage.file_count(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_document_is_rejected_before_upload() {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.submitted_kyc(&client).await;
        let expired = fixture.document(client.id, Some(Utc::now() - Duration::days(1))).await;
        let files_before = fixture.storage.file_count();

        let error = fixture
            .service
            .submit_review(
                &fixture.staff,
                kyc.id,
                SubmitReviewRequest {
                    signature: signature(),
                    document_ids: vec![expired.id],
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::ValidationError(_)));
        assert_eq!(fixture.storage.file_count(), files_before);
    }

    #[tokio::test]
    async fn test_storage_outage_is_an_upstream_error() {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.submitted_kyc(&client).await;
        fixture.storage.set_unavailable(true);

        let error = fixture
            .service
            .submit_review(
                &fixture.staff,
                kyc.id,
                SubmitReviewRequest {
                    signature: signature(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::UpstreamError(_)));
        assert_eq!(fixture.service.get_kyc(&fixture.staff, kyc.id).await.unwrap().status, KycStatus::Submitted);
    }

    #[tokio::test]
    async fn test_upload_runs_without_a_database_session() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.submitted_kyc(&client).await;
        let (service, storage) = interleaving_service(&fixture, None);

        let outcome = service
            .submit_review(
                &fixture.staff,
                kyc.id,
                SubmitReviewRequest {
                    signature: signature(),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(outcome.kyc.status, KycStatus::ResponsibleReviewed);
        assert_eq!(storage.inner.file_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_changed_during_upload_is_a_conflict() {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.submitted_kyc(&client).await;
        let (service, storage) = interleaving_service(&fixture, Some((kyc.id, fixture.admin.id)));

        let error = service
            .submit_review(
                &fixture.staff,
                kyc.id,
                SubmitReviewRequest {
                    signature: signature(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Conflict(_)));

        let after = fixture.uow.snapshot().await;
        let stored = after.kyc.iter().find(|k| k.id == kyc.id).unwrap();
        assert_eq!(stored.status, KycStatus::Submitted);
        assert!(!after.client_documents.iter().any(|d| d.is_signature));
        // The upload happened before the change was noticed.
        assert_eq!(storage.inner.file_count(), 1);
    }
}
