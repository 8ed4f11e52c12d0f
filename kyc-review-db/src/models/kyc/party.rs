use std::sync::Arc;

use chrono::NaiveDate;
use kyc_review_api::{ManagementPersonInput, PartyInput, RelatedPersonInput, ShareholderInput, UboInput};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::audit::{AuditEntityType, AuditTracked};
use crate::models::identifiable::Identifiable;
use crate::models::scoped::KycScoped;
use crate::repository::PartyRepository;
use crate::unit_of_work::ReviewRepositories;

/// Row of one of the four party collections attached to a KYC record.
///
/// Collections are replaced wholesale by set-reconciliation; see
/// [`crate::workflow::reconcile`].
pub trait PartyModel: Identifiable + KycScoped + AuditTracked + Clone + Send + Sync + 'static {
    type Input: PartyInput + Send + Sync + 'static;

    fn name(&self) -> &str;

    /// The repository holding this collection within a unit of work.
    fn repository(repositories: &ReviewRepositories) -> &Arc<dyn PartyRepository<Self>>;

    /// Builds the stored row for `input`, keeping `id` and `kyc_id`.
    fn from_input(id: Uuid, kyc_id: Uuid, input: Self::Input) -> Self;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RelatedPersonModel {
    pub id: Uuid,
    pub kyc_id: Uuid,
    pub name: String,
    pub relationship: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ManagementPersonModel {
    pub id: Uuid,
    pub kyc_id: Uuid,
    pub name: String,
    pub function: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ShareholderModel {
    pub id: Uuid,
    pub kyc_id: Uuid,
    pub name: String,
    pub ownership_percentage: Option<Decimal>,
    pub nationality: Option<String>,
    pub is_legal_entity: bool,
}

/// Ultimate beneficial owner of a legal-entity client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UboModel {
    pub id: Uuid,
    pub kyc_id: Uuid,
    pub name: String,
    pub ownership_percentage: Option<Decimal>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub is_pep: bool,
}

macro_rules! impl_party_identity {
    ($($ty:ty),*) => {
        $(
            impl Identifiable for $ty {
                fn get_id(&self) -> Uuid {
                    self.id
                }
            }

            impl KycScoped for $ty {
                fn kyc_id(&self) -> Uuid {
                    self.kyc_id
                }
            }
        )*
    };
}

impl_party_identity!(RelatedPersonModel, ManagementPersonModel, ShareholderModel, UboModel);

impl AuditTracked for RelatedPersonModel {
    const ENTITY_TYPE: AuditEntityType = AuditEntityType::RelatedPerson;
}

impl PartyModel for RelatedPersonModel {
    type Input = RelatedPersonInput;

    fn name(&self) -> &str {
        &self.name
    }

    fn repository(repositories: &ReviewRepositories) -> &Arc<dyn PartyRepository<Self>> {
        &repositories.related_person_repository
    }

    fn from_input(id: Uuid, kyc_id: Uuid, input: RelatedPersonInput) -> Self {
        Self {
            id,
            kyc_id,
            name: input.name.trim().to_string(),
            relationship: input.relationship,
            email: input.email,
            phone: input.phone,
        }
    }
}

impl AuditTracked for ManagementPersonModel {
    const ENTITY_TYPE: AuditEntityType = AuditEntityType::ManagementPerson;
}

impl PartyModel for ManagementPersonModel {
    type Input = ManagementPersonInput;

    fn name(&self) -> &str {
        &self.name
    }

    fn repository(repositories: &ReviewRepositories) -> &Arc<dyn PartyRepository<Self>> {
        &repositories.management_person_repository
    }

    fn from_input(id: Uuid, kyc_id: Uuid, input: ManagementPersonInput) -> Self {
        Self {
            id,
            kyc_id,
            name: input.name.trim().to_string(),
            function: input.function,
            nationality: input.nationality,
            date_of_birth: input.date_of_birth,
        }
    }
}

impl AuditTracked for ShareholderModel {
    const ENTITY_TYPE: AuditEntityType = AuditEntityType::Shareholder;
}

impl PartyModel for ShareholderModel {
    type Input = ShareholderInput;

    fn name(&self) -> &str {
        &self.name
    }

    fn repository(repositories: &ReviewRepositories) -> &Arc<dyn PartyRepository<Self>> {
        &repositories.shareholder_repository
    }

    fn from_input(id: Uuid, kyc_id: Uuid, input: ShareholderInput) -> Self {
        Self {
            id,
            kyc_id,
            name: input.name.trim().to_string(),
            ownership_percentage: input.ownership_percentage,
            nationality: input.nationality,
            is_legal_entity: input.is_legal_entity,
        }
    }
}

impl AuditTracked for UboModel {
    const ENTITY_TYPE: AuditEntityType = AuditEntityType::Ubo;
}

impl PartyModel for UboModel {
    type Input = UboInput;

    fn name(&self) -> &str {
        &self.name
    }

    fn repository(repositories: &ReviewRepositories) -> &Arc<dyn PartyRepository<Self>> {
        &repositories.ubo_repository
    }

    fn from_input(id: Uuid, kyc_id: Uuid, input: UboInput) -> Self {
        Self {
            id,
            kyc_id,
            name: input.name.trim().to_string(),
            ownership_percentage: input.ownership_percentage,
            nationality: input.nationality,
            date_of_birth: input.date_of_birth,
            address: input.address,
            is_pep: input.is_pep,
        }
    }
}
