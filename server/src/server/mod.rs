pub mod groups;
pub mod http;
pub mod router;
pub mod run;
pub mod sessions;
pub mod state;
pub mod ws;

// Export commonly used types and functions
pub use run::run_server;
pub use state::{AppState, ConnId};
