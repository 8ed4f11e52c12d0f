pub mod create_batch;
pub mod delete_batch;
pub mod find_by_kyc_id;
pub mod party_table;
pub mod repo_impl;
pub mod update_batch;

pub use party_table::PartyTable;
pub use repo_impl::PartyRepositoryImpl;
