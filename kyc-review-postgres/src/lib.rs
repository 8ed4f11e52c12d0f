pub mod executor;
pub mod repository;
pub mod unit_of_work;
pub mod utils;

pub use executor::Executor;
pub use repository::db_init::{cleanup_database, init_database};
pub use unit_of_work::{PostgresSession, PostgresUnitOfWork};

#[cfg(test)]
pub mod test_helper;
