pub mod kyc;
pub mod kyc_document_file;
pub mod party;

pub use kyc::*;
pub use kyc_document_file::*;
pub use party::*;
