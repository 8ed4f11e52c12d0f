pub mod kyc_document_file_repository;
pub mod kyc_repository;
pub mod party_repository;

pub use kyc_document_file_repository::KycDocumentFileRepositoryImpl;
pub use kyc_repository::KycRepositoryImpl;
pub use party_repository::{PartyRepositoryImpl, PartyTable};
