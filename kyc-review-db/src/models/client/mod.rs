pub mod client;
pub mod client_document;

pub use client::*;
pub use client_document::*;
