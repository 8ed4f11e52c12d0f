use chrono::Utc;
use kyc_review_api::{
    ApiError, ApiResult, CreateKycRequest, CurrentUser, KycDetails, ReviewSectionEdit, UpdateKycRequest,
};
use kyc_review_db::models::kyc::KycModel;
use kyc_review_db::repository::{CreateBatch, FindByAgencyId, Load, Page, PageRequest, UpdateBatch};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{commit, load_kyc, map_write_error, open_audit_log, ReviewService};

impl ReviewService {
    /// Opens a KYC record for a client of the caller's agency.
    pub async fn create_kyc(&self, user: &CurrentUser, request: CreateKycRequest) -> ApiResult<KycModel> {
        request.validate()?;

        let session = self.begin().await?;
        let repositories = session.repositories();

        let client = match repositories.client_repository.load(request.client_id).await? {
            Some(client) if client.agency_id == user.agency_id => client,
            _ => return Err(ApiError::not_found("client", request.client_id)),
        };
        if request.details.kyc_type() != client.client_type {
            return Err(ApiError::ValidationError(format!(
                "{} details do not match {} client {}",
                request.details.kyc_type(),
                client.client_type,
                client.id
            )));
        }

        let mut services = request.services;
        services.sort();
        services.dedup();

        let audit_log_id = open_audit_log(repositories, user).await?;
        let kyc = KycModel::new(client.id, user.agency_id, services, request.details);
        let mut saved = repositories
            .kyc_repository
            .create_batch(vec![kyc], audit_log_id)
            .await?;
        let kyc = saved.pop().ok_or_else(|| ApiError::InternalError("KYC record was not saved".to_string()))?;

        commit(session).await?;
        info!(kyc_id = %kyc.id, client_id = %kyc.client_id, kyc_type = %kyc.kyc_type, "KYC record created");
        Ok(kyc)
    }

    /// Records of the caller's agency, newest first.
    pub async fn list_kyc(&self, user: &CurrentUser, page: PageRequest) -> ApiResult<Page<KycModel>> {
        let session = self.begin().await?;
        Ok(session
            .repositories()
            .kyc_repository
            .find_by_agency_id(user.agency_id, page)
            .await?)
    }

    pub async fn get_kyc(&self, user: &CurrentUser, kyc_id: Uuid) -> ApiResult<KycModel> {
        let session = self.begin().await?;
        load_kyc(session.repositories(), user, kyc_id).await
    }

    /// Saves edits to the form and to the review section of the current
    /// stage without advancing the status.
    pub async fn update_kyc(&self, user: &CurrentUser, kyc_id: Uuid, request: UpdateKycRequest) -> ApiResult<KycModel> {
        request.validate()?;

        let session = self.begin().await?;
        let repositories = session.repositories();
        let mut kyc = load_kyc(repositories, user, kyc_id).await?;
        if kyc.status.is_terminal() {
            return Err(ApiError::InvalidState(format!("KYC record {kyc_id} is completed")));
        }

        apply_edits(&mut kyc, request.details, request.review)?;
        kyc.updated_at = Utc::now();

        let audit_log_id = open_audit_log(repositories, user).await?;
        let mut saved = repositories
            .kyc_repository
            .update_batch(vec![kyc], audit_log_id)
            .await
            .map_err(map_write_error)?;
        let kyc = saved.pop().ok_or_else(|| ApiError::InternalError("KYC record was not saved".to_string()))?;

        commit(session).await?;
        info!(kyc_id = %kyc.id, status = %kyc.status, "KYC record updated");
        Ok(kyc)
    }
}

/// Merges a details edit and a review-section edit into `kyc`.
///
/// The details variant must match the record type and the review section
/// must belong to the record's current status.
pub(crate) fn apply_edits(
    kyc: &mut KycModel,
    details: Option<KycDetails>,
    review: Option<ReviewSectionEdit>,
) -> ApiResult<()> {
    if let Some(details) = &details {
        if details.kyc_type() != kyc.kyc_type {
            return Err(ApiError::ValidationError(format!(
                "{} details cannot be stored on a {} record",
                details.kyc_type(),
                kyc.kyc_type
            )));
        }
    }
    if let Some(review) = &review {
        if review.editable_at() != kyc.status {
            return Err(ApiError::ValidationError(format!(
                "review section for {} cannot be edited while the record is {}",
                review.editable_at(),
                kyc.status
            )));
        }
    }

    if let Some(details) = details {
        kyc.details = details;
    }
    if let Some(review) = review {
        review.apply(&mut kyc.review);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_review_api::{
        ComplianceReview, Declarations, KycStatus, KycSubject, LegalEntityDetails, ResponsibleReview, RiskLevel,
        ServiceKind,
    };

    use crate::service::test_support::{natural_details, Fixture};

    #[tokio::test]
    async fn test_create_and_get() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;

        let kyc = fixture
            .service
            .create_kyc(
                &fixture.staff,
                CreateKycRequest {
                    client_id: client.id,
                    services: vec![ServiceKind::Payroll, ServiceKind::Accounting, ServiceKind::Payroll],
                    details: natural_details(),
                },
            )
            .await?;

        assert_eq!(kyc.status, KycStatus::Submitted);
        assert_eq!(kyc.services, vec![ServiceKind::Accounting, ServiceKind::Payroll]);
        assert_eq!(fixture.service.get_kyc(&fixture.staff, kyc.id).await?, kyc);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_mismatched_subject() {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;

        let error = fixture
            .service
            .create_kyc(
                &fixture.staff,
                CreateKycRequest {
                    client_id: client.id,
                    services: vec![ServiceKind::Audit],
                    details: KycDetails {
                        subject: KycSubject::Legal(LegalEntityDetails {
                            company_name: "Acme Holdings".to_string(),
                            ..Default::default()
                        }),
                        declarations: Declarations::default(),
                    },
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_other_agency_sees_not_found() {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.submitted_kyc(&client).await;

        let outsider = fixture.outsider();
        let error = fixture.service.get_kyc(&outsider, kyc.id).await.unwrap_err();
        assert!(matches!(error, ApiError::NotFound(_)));

        let page = fixture.service.list_kyc(&outsider, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_update_only_edits_current_stage() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.submitted_kyc(&client).await;

        let updated = fixture
            .service
            .update_kyc(
                &fixture.staff,
                kyc.id,
                UpdateKycRequest {
                    details: None,
                    review: Some(ReviewSectionEdit::Responsible(ResponsibleReview {
                        risk_level: Some(RiskLevel::Low),
                        identity_verified: true,
                        ..Default::default()
                    })),
                },
            )
            .await?;
        assert_eq!(updated.status, KycStatus::Submitted);
        assert_eq!(updated.review.responsible.as_ref().unwrap().risk_level, Some(RiskLevel::Low));
        assert_ne!(updated.hash, kyc.hash);

        let error = fixture
            .service
            .update_kyc(
                &fixture.staff,
                kyc.id,
                UpdateKycRequest {
                    details: None,
                    review: Some(ReviewSectionEdit::Compliance(ComplianceReview::default())),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::ValidationError(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejects_completed_record() {
        let fixture = Fixture::new().await;
        let client = fixture.natural_client().await;
        let kyc = fixture.completed_kyc(&client).await;

        let error = fixture
            .service
            .update_kyc(
                &fixture.staff,
                kyc.id,
                UpdateKycRequest {
                    details: Some(natural_details()),
                    review: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::InvalidState(_)));
    }
}
