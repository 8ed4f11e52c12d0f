pub mod config;
pub mod logging;
pub mod routes;
pub mod service;
pub mod session;
pub mod state;
pub mod storage;

pub use config::ServerConfig;
pub use routes::build_router;
pub use service::ReviewService;
pub use state::AppState;
