//! Clients of the hosted file-storage service.

pub mod http;
pub mod memory;

pub use http::HttpFileStorage;
pub use memory::MemoryFileStorage;
