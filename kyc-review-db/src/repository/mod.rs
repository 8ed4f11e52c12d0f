pub mod audit;
pub mod client;
pub mod create_batch;
pub mod delete_batch;
pub mod document;
pub mod error;
pub mod find_by_agency_id;
pub mod find_by_client_id;
pub mod find_by_kyc_id;
pub mod kyc;
pub mod load;
pub mod load_batch;
pub mod pagination;
pub mod party;
pub mod update_batch;
pub mod user;

// Re-exports
pub use audit::*;
pub use client::*;
pub use create_batch::*;
pub use delete_batch::*;
pub use document::*;
pub use error::*;
pub use find_by_agency_id::*;
pub use find_by_client_id::*;
pub use find_by_kyc_id::*;
pub use kyc::*;
pub use load::*;
pub use load_batch::*;
pub use pagination::*;
pub use party::*;
pub use update_batch::*;
pub use user::*;
