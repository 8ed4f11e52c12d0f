//! In-memory backend used for local development and tests.

pub mod audit;
pub mod link;
pub mod repository;
pub mod state;
pub mod table;
pub mod unit_of_work;

pub use audit::*;
pub use link::*;
pub use repository::MemoryRepository;
pub use state::*;
pub use table::*;
pub use unit_of_work::*;
