//! Timestamp oracle port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AudioMimeType, TopicPrompt};

/// Errors that can occur while querying the oracle
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("File processing timed out")]
    ProcessingTimeout,

    #[error("Empty model response")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Processing state of an uploaded remote file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFileState {
    Processing,
    Active,
    Failed,
}

/// Handle to an audio file uploaded to the oracle's file store
#[derive(Debug, Clone)]
pub struct RemoteAudioFile {
    /// Server-side resource name, used for polling and deletion
    pub name: String,
    /// URI referenced from generation requests
    pub uri: String,
    pub mime_type: AudioMimeType,
    pub state: RemoteFileState,
}

impl RemoteAudioFile {
    /// Whether the file is ready to be referenced from a query
    pub fn is_active(&self) -> bool {
        self.state == RemoteFileState::Active
    }
}

/// Port for the model that locates a topic inside uploaded audio
#[async_trait]
pub trait TimestampOracle: Send + Sync {
    /// Upload a local audio file to the oracle's file store
    async fn upload(
        &self,
        path: &Path,
        mime_type: AudioMimeType,
    ) -> Result<RemoteAudioFile, OracleError>;

    /// Wait until the uploaded file becomes active
    async fn await_active(&self, file: &RemoteAudioFile) -> Result<RemoteAudioFile, OracleError>;

    /// Ask the model for the raw timestamp string answering `prompt`
    async fn find_timestamp(
        &self,
        file: &RemoteAudioFile,
        prompt: &TopicPrompt,
    ) -> Result<String, OracleError>;

    /// Delete the uploaded file from the oracle's file store
    async fn delete(&self, file: &RemoteAudioFile) -> Result<(), OracleError>;
}
