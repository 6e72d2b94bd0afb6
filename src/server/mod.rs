//! Server layer - HTTP surface and process lifecycle
//!
//! Wires the use case to axum routes, owns startup configuration
//! and graceful shutdown.

pub mod app;
pub mod args;
pub mod handlers;
pub mod router;
pub mod state;

// Re-export common types
pub use app::{run_server, EXIT_ERROR, EXIT_SUCCESS};
pub use args::Cli;
pub use router::create_router;
pub use state::AppState;
