//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like yt-dlp and the Gemini API.

pub mod config;
pub mod download;
pub mod observability;
pub mod oracle;

// Re-export adapters
pub use config::XdgConfigStore;
pub use download::YtDlpDownloader;
pub use oracle::GeminiOracle;
