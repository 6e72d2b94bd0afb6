//! Audio downloader port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use thiserror::Error;

use crate::domain::AudioMimeType;

/// Errors that can occur while downloading audio
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("yt-dlp not found. Install it and make sure it is on PATH")]
    ToolNotFound,

    #[error("yt-dlp error: {0}")]
    ProcessFailed(String),

    #[error("Download timed out after {0} seconds")]
    TimedOut(u64),

    #[error("Audio file not created")]
    AssetMissing,

    #[error("yt-dlp I/O error: {0}")]
    Io(String),
}

/// Downloaded audio with its backing temporary directory.
///
/// The directory and everything in it are removed when this value is
/// dropped, so the file stays valid exactly as long as the handle is
/// alive.
#[derive(Debug)]
pub struct DownloadedAudio {
    dir: TempDir,
    path: PathBuf,
    mime_type: AudioMimeType,
}

impl DownloadedAudio {
    pub fn new(dir: TempDir, path: PathBuf, mime_type: AudioMimeType) -> Self {
        Self {
            dir,
            path,
            mime_type,
        }
    }

    /// Path of the downloaded audio file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// MIME type of the downloaded audio
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Path of the temporary directory holding the file
    pub fn dir_path(&self) -> &Path {
        self.dir.path()
    }
}

/// Port for downloading a video's audio track
#[async_trait]
pub trait AudioDownloader: Send + Sync {
    /// Download the audio track of the video at `video_url`
    async fn download(&self, video_url: &str) -> Result<DownloadedAudio, DownloadError>;
}
