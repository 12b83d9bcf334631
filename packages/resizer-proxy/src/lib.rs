pub mod config;
pub mod handler;
pub mod router;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use router::build_router;
pub use state::AppState;
