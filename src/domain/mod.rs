//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod location;

// Re-export common types
pub use audio::AudioMimeType;
pub use config::AppConfig;
pub use error::*;
pub use location::{Timestamp, TopicPrompt, VideoId};
