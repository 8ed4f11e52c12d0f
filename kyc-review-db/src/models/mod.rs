pub mod audit;
pub mod auditable;
pub mod client;
pub mod identifiable;
pub mod kyc;
pub mod scoped;
pub mod user;

// Re-exports
pub use audit::*;
pub use auditable::*;
pub use client::*;
pub use identifiable::*;
pub use kyc::*;
pub use scoped::*;
pub use user::*;
