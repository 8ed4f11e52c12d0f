use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Incoming row of a party collection attached to a KYC record.
///
/// A row without `id` is new; a row with `id` updates the existing row.
/// Rows with a blank name are form placeholders and carry nothing to save.
pub trait PartyInput {
    fn id(&self) -> Option<Uuid>;
    fn name(&self) -> &str;

    fn is_placeholder(&self) -> bool {
        self.name().trim().is_empty()
    }
}

fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percentage_out_of_range"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RelatedPersonInput {
    pub id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(length(max = 100))]
    pub relationship: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ManagementPersonInput {
    pub id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(length(max = 100))]
    pub function: Option<String>,
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ShareholderInput {
    pub id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(custom(function = "validate_percentage"))]
    pub ownership_percentage: Option<Decimal>,
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    #[serde(default)]
    pub is_legal_entity: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UboInput {
    pub id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(custom(function = "validate_percentage"))]
    pub ownership_percentage: Option<Decimal>,
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[serde(default)]
    pub is_pep: bool,
}

macro_rules! impl_party_input {
    ($($ty:ty),*) => {
        $(
            impl PartyInput for $ty {
                fn id(&self) -> Option<Uuid> {
                    self.id
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

impl_party_input!(RelatedPersonInput, ManagementPersonInput, ShareholderInput, UboInput);
