//! Locate topic use case

use thiserror::Error;

use crate::domain::{Timestamp, TopicPrompt, VideoId};

use super::ports::{AudioDownloader, DownloadError, OracleError, RemoteAudioFile, TimestampOracle};

/// Errors from the locate topic use case
#[derive(Debug, Error)]
pub enum LocateTopicError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Input parameters for the locate topic use case
#[derive(Debug, Clone)]
pub struct LocateTopicInput {
    /// URL of the video to inspect
    pub video_url: String,
    /// Topic to find in the audio track
    pub topic: String,
}

/// Output from the locate topic use case
#[derive(Debug, Clone)]
pub struct LocateTopicOutput {
    /// Moment the topic is first spoken
    pub timestamp: Timestamp,
    /// Echo of the requested video URL
    pub video_url: String,
    /// Echo of the requested topic
    pub topic: String,
}

/// One-shot topic location use case
pub struct LocateTopicUseCase<D, O>
where
    D: AudioDownloader,
    O: TimestampOracle,
{
    downloader: D,
    oracle: O,
}

impl<D, O> LocateTopicUseCase<D, O>
where
    D: AudioDownloader,
    O: TimestampOracle,
{
    /// Create a new use case instance
    pub fn new(downloader: D, oracle: O) -> Self {
        Self { downloader, oracle }
    }

    /// Execute the locate workflow
    pub async fn execute(
        &self,
        input: LocateTopicInput,
    ) -> Result<LocateTopicOutput, LocateTopicError> {
        if let Some(id) = VideoId::extract(&input.video_url) {
            tracing::debug!(video_id = %id, "Recognized video identifier");
        }

        // The temp dir behind `audio` lives until this binding drops
        let audio = self.downloader.download(&input.video_url).await?;

        let uploaded = self.oracle.upload(audio.path(), audio.mime_type()).await?;

        // Hold the query outcome until the remote file is cleaned up
        let outcome = self.query_uploaded(&uploaded, &input.topic).await;

        if let Err(e) = self.oracle.delete(&uploaded).await {
            tracing::warn!(file = %uploaded.name, error = %e, "Failed to delete remote audio file");
        }

        let raw = outcome?;
        let timestamp = Timestamp::normalize(&raw);

        Ok(LocateTopicOutput {
            timestamp,
            video_url: input.video_url,
            topic: input.topic,
        })
    }

    async fn query_uploaded(
        &self,
        uploaded: &RemoteAudioFile,
        topic: &str,
    ) -> Result<String, OracleError> {
        let active = self.oracle.await_active(uploaded).await?;
        let prompt = TopicPrompt::for_topic(topic);
        self.oracle.find_timestamp(&active, &prompt).await
    }
}
