use kyc_review_db::models::kyc::{ManagementPersonModel, PartyModel, RelatedPersonModel, ShareholderModel, UboModel};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, Postgres};

use crate::utils::placeholders;

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Table layout of one party collection.
///
/// Every party table starts with `id, kyc_id`; `COLUMNS` lists the columns
/// after those two, in the order `bind_columns` binds them.
pub trait PartyTable: PartyModel + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q>;

    fn select_sql() -> String {
        format!("SELECT id, kyc_id, {} FROM {}", Self::COLUMNS.join(", "), Self::TABLE)
    }

    fn insert_sql() -> String {
        format!(
            "INSERT INTO {} (id, kyc_id, {}) VALUES ($1, $2, {})",
            Self::TABLE,
            Self::COLUMNS.join(", "),
            placeholders(3, Self::COLUMNS.len())
        )
    }

    fn update_sql() -> String {
        let assignments = Self::COLUMNS
            .iter()
            .enumerate()
            .map(|(n, column)| format!("{column} = ${}", n + 3))
            .collect::<Vec<_>>()
            .join(", ");
        format!("UPDATE {} SET {assignments} WHERE id = $1 AND kyc_id = $2", Self::TABLE)
    }
}

impl PartyTable for RelatedPersonModel {
    const TABLE: &'static str = "related_person";
    const COLUMNS: &'static [&'static str] = &["name", "relationship", "email", "phone"];

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.relationship.clone())
            .bind(self.email.clone())
            .bind(self.phone.clone())
    }
}

impl PartyTable for ManagementPersonModel {
    const TABLE: &'static str = "management_person";
    const COLUMNS: &'static [&'static str] = &["name", "function", "nationality", "date_of_birth"];

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.function.clone())
            .bind(self.nationality.clone())
            .bind(self.date_of_birth)
    }
}

impl PartyTable for ShareholderModel {
    const TABLE: &'static str = "shareholder";
    const COLUMNS: &'static [&'static str] = &["name", "ownership_percentage", "nationality", "is_legal_entity"];

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.ownership_percentage)
            .bind(self.nationality.clone())
            .bind(self.is_legal_entity)
    }
}

impl PartyTable for UboModel {
    const TABLE: &'static str = "ubo";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "ownership_percentage",
        "nationality",
        "date_of_birth",
        "address",
        "is_pep",
    ];

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.ownership_percentage)
            .bind(self.nationality.clone())
            .bind(self.date_of_birth)
            .bind(self.address.clone())
            .bind(self.is_pep)
    }
}
