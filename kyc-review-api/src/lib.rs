pub mod domain;
pub mod error;
pub mod request;
pub mod service;
pub mod session;

pub use domain::*;
pub use error::*;
pub use request::*;
pub use service::*;
pub use session::*;
