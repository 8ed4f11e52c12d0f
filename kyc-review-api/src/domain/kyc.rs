use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use super::status::KycStatus;

/// Kind of subject a KYC form describes; fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "kyc_type", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum KycType {
    Natural,
    Legal,
}

impl KycType {
    pub fn as_str(self) -> &'static str {
        match self {
            KycType::Natural => "natural",
            KycType::Legal => "legal",
        }
    }
}

impl fmt::Display for KycType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Services a client may request at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Accounting,
    Payroll,
    TaxAdvisory,
    CompanyFormation,
    Domiciliation,
    FiduciaryManagement,
    LegalAdvisory,
    Audit,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Accounting => "accounting",
            ServiceKind::Payroll => "payroll",
            ServiceKind::TaxAdvisory => "tax_advisory",
            ServiceKind::CompanyFormation => "company_formation",
            ServiceKind::Domiciliation => "domiciliation",
            ServiceKind::FiduciaryManagement => "fiduciary_management",
            ServiceKind::LegalAdvisory => "legal_advisory",
            ServiceKind::Audit => "audit",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accounting" => Ok(ServiceKind::Accounting),
            "payroll" => Ok(ServiceKind::Payroll),
            "tax_advisory" => Ok(ServiceKind::TaxAdvisory),
            "company_formation" => Ok(ServiceKind::CompanyFormation),
            "domiciliation" => Ok(ServiceKind::Domiciliation),
            "fiduciary_management" => Ok(ServiceKind::FiduciaryManagement),
            "legal_advisory" => Ok(ServiceKind::LegalAdvisory),
            "audit" => Ok(ServiceKind::Audit),
            other => Err(format!("Unknown service: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(max = 255))]
    pub street: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct NaturalPersonDetails {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub place_of_birth: Option<String>,
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    #[validate(length(max = 50))]
    pub id_document_number: Option<String>,
    #[validate(length(max = 100))]
    pub profession: Option<String>,
    #[validate(length(max = 255))]
    pub employer: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub address: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct LegalEntityDetails {
    #[validate(length(min = 1, max = 255))]
    pub company_name: String,
    #[validate(length(max = 100))]
    pub legal_form: Option<String>,
    #[validate(length(max = 100))]
    pub registration_number: Option<String>,
    pub registration_date: Option<NaiveDate>,
    #[validate(length(max = 50))]
    pub vat_number: Option<String>,
    #[validate(length(max = 500))]
    pub business_activity: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 50))]
    pub contact_phone: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub registered_address: Address,
}

/// Declarations common to both subject kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Declarations {
    pub is_pep: Option<bool>,
    #[validate(length(max = 1000))]
    pub pep_details: Option<String>,
    #[validate(length(max = 1000))]
    pub source_of_funds: Option<String>,
    #[validate(length(max = 100))]
    pub tax_residency: Option<String>,
    pub is_us_person: Option<bool>,
    #[serde(default)]
    pub confirms_truthfulness: bool,
}

/// Subject-specific payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KycSubject {
    Natural(NaturalPersonDetails),
    Legal(LegalEntityDetails),
}

impl KycSubject {
    pub fn kyc_type(&self) -> KycType {
        match self {
            KycSubject::Natural(_) => KycType::Natural,
            KycSubject::Legal(_) => KycType::Legal,
        }
    }

    /// Display name of the subject.
    pub fn display_name(&self) -> String {
        match self {
            KycSubject::Natural(person) => format!("{} {}", person.first_name, person.last_name),
            KycSubject::Legal(entity) => entity.company_name.clone(),
        }
    }
}

impl Validate for KycSubject {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            KycSubject::Natural(person) => person.validate(),
            KycSubject::Legal(entity) => entity.validate(),
        }
    }
}

fn validate_subject(subject: &KycSubject) -> Result<(), ValidationError> {
    subject.validate().map_err(|errors| {
        let mut error = ValidationError::new("invalid_subject");
        error.message = Some(errors.to_string().into());
        error
    })
}

/// Validates a review edit as a single field of an enclosing request.
pub fn validate_review_edit(edit: &ReviewSectionEdit) -> Result<(), ValidationError> {
    edit.validate().map_err(|errors| {
        let mut error = ValidationError::new("invalid_review");
        error.message = Some(errors.to_string().into());
        error
    })
}

/// Full form content of a KYC record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct KycDetails {
    #[validate(custom(function = "validate_subject"))]
    pub subject: KycSubject,
    #[serde(default)]
    #[validate(nested)]
    pub declarations: Declarations,
}

impl KycDetails {
    pub fn kyc_type(&self) -> KycType {
        self.subject.kyc_type()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitteeDecision {
    Approved,
    Rejected,
    Escalated,
}

/// Due-diligence checks recorded by the responsible reviewer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ResponsibleReview {
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub identity_verified: bool,
    #[serde(default)]
    pub address_verified: bool,
    #[serde(default)]
    pub source_of_funds_verified: bool,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Screening checks recorded by compliance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ComplianceReview {
    #[serde(default)]
    pub sanctions_screened: bool,
    #[serde(default)]
    pub pep_screened: bool,
    #[serde(default)]
    pub adverse_media_checked: bool,
    #[serde(default)]
    pub risk_confirmed: bool,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Decision of the oversight committee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct OversightReview {
    pub decision: Option<CommitteeDecision>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Review sections accumulated over the workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSections {
    pub responsible: Option<ResponsibleReview>,
    pub compliance: Option<ComplianceReview>,
    pub oversight: Option<OversightReview>,
}

/// An edit to exactly one review section, tagged by `stage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ReviewSectionEdit {
    Responsible(ResponsibleReview),
    Compliance(ComplianceReview),
    Oversight(OversightReview),
}

impl ReviewSectionEdit {
    /// Status a record must be in for this section to be editable.
    pub fn editable_at(&self) -> KycStatus {
        match self {
            ReviewSectionEdit::Responsible(_) => KycStatus::Submitted,
            ReviewSectionEdit::Compliance(_) => KycStatus::ResponsibleReviewed,
            ReviewSectionEdit::Oversight(_) => KycStatus::ComplianceReviewed,
        }
    }

    pub fn apply(self, sections: &mut ReviewSections) {
        match self {
            ReviewSectionEdit::Responsible(review) => sections.responsible = Some(review),
            ReviewSectionEdit::Compliance(review) => sections.compliance = Some(review),
            ReviewSectionEdit::Oversight(review) => sections.oversight = Some(review),
        }
    }
}

impl Validate for ReviewSectionEdit {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            ReviewSectionEdit::Responsible(review) => review.validate(),
            ReviewSectionEdit::Compliance(review) => review.validate(),
            ReviewSectionEdit::Oversight(review) => review.validate(),
        }
    }
}
