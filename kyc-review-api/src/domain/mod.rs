pub mod kyc;
pub mod party;
pub mod status;

pub use kyc::*;
pub use party::*;
pub use status::*;
