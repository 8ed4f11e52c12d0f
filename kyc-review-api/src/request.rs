//! Request payloads accepted by the review services.
//!
//! Structural rules are declared with `validator`; semantic rules that need
//! stored state (record type, current status, document ownership) are
//! checked by the services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::domain::{
    validate_review_edit, KycDetails, KycType, ManagementPersonInput, RelatedPersonInput, ReviewSectionEdit, ServiceKind,
    ShareholderInput, UboInput,
};
use crate::session::Role;

/// Upper bound on documents attached by one review submission.
pub const MAX_SELECTED_DOCUMENTS: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateKycRequest {
    pub client_id: Uuid,
    #[validate(length(min = 1, message = "at least one service must be requested"))]
    pub services: Vec<ServiceKind>,
    #[validate(nested)]
    pub details: KycDetails,
}

/// Edits to a record that do not advance its status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateKycRequest {
    #[validate(nested)]
    pub details: Option<KycDetails>,
    #[validate(custom(function = "validate_review_edit"))]
    pub review: Option<ReviewSectionEdit>,
}

/// One review step: edits, a freshly captured signature, documents to attach
/// and the party collections as currently shown in the review form.
///
/// A party collection left out (`None`) is not touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SubmitReviewRequest {
    #[validate(nested)]
    pub details: Option<KycDetails>,
    #[validate(custom(function = "validate_review_edit"))]
    pub review: Option<ReviewSectionEdit>,
    /// PNG image, either as a `data:image/png;base64,` URL or bare base64.
    #[validate(length(min = 1, message = "a signature is required"))]
    pub signature: String,
    #[serde(default)]
    #[validate(length(max = MAX_SELECTED_DOCUMENTS, message = "too many documents selected"))]
    pub document_ids: Vec<Uuid>,
    #[validate(nested)]
    pub related_persons: Option<Vec<RelatedPersonInput>>,
    #[validate(nested)]
    pub management_persons: Option<Vec<ManagementPersonInput>>,
    #[validate(nested)]
    pub shareholders: Option<Vec<ShareholderInput>>,
    #[validate(nested)]
    pub ubos: Option<Vec<UboInput>>,
}

/// Replacement of one party collection of a KYC record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyCollectionRequest<T> {
    pub kyc_id: Uuid,
    #[serde(default)]
    pub items: Vec<T>,
}

impl<T: Validate> Validate for PartyCollectionRequest<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub client_type: KycType,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadDocumentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
    #[validate(length(min = 1, message = "document content is required"))]
    pub data_base64: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub role: Role,
}
