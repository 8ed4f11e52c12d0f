pub mod client_document_repository;
pub mod client_repository;

pub use client_document_repository::ClientDocumentRepositoryImpl;
pub use client_repository::ClientRepositoryImpl;
