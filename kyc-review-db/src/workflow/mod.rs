pub mod availability;
pub mod reconcile;

pub use availability::*;
pub use reconcile::*;
