//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod downloader;
pub mod oracle;

// Re-export common types
pub use downloader::{AudioDownloader, DownloadError, DownloadedAudio};
pub use oracle::{OracleError, RemoteAudioFile, RemoteFileState, TimestampOracle};
