pub mod memory;
pub mod models;
pub mod repository;
pub mod unit_of_work;
pub mod utils;
pub mod workflow;

pub use unit_of_work::*;
