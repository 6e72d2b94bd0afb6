//! TopicSeek - find when a topic is spoken in a video
//!
//! This crate provides an HTTP service that downloads a video's audio track,
//! submits it to Google Gemini, and answers with the timestamp at which a
//! given topic is first discussed.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (yt-dlp, Gemini, config, tracing)
//! - **Server**: HTTP surface, argument parsing, and application bootstrap

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod server;
