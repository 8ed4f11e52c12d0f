pub mod audit;
pub mod client;
pub mod db_init;
pub mod factory;
pub mod kyc;
pub mod user;

pub use factory::build_all_repos;
