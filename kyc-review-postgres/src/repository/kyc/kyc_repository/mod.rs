pub mod create_batch;
pub mod find_by_agency_id;
pub mod load;
pub mod repo_impl;
pub mod update_batch;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::KycRepositoryImpl;
