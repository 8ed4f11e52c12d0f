pub mod create_batch;
pub mod find_by_agency_id;
pub mod load;
pub mod repo_impl;

pub use repo_impl::ClientRepositoryImpl;
