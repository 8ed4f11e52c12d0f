pub mod find_by_kyc_id;
pub mod link;
pub mod repo_impl;

pub use repo_impl::KycDocumentFileRepositoryImpl;
