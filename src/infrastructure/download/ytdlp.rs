//! yt-dlp based audio downloader adapter

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::{Child, Command};

use crate::application::ports::{AudioDownloader, DownloadError, DownloadedAudio};
use crate::domain::AudioMimeType;

/// Seconds a download may run before it is killed
const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// File stem the extracted audio is written under
const OUTPUT_STEM: &str = "audio";

const DEFAULT_PROGRAM: &str = "yt-dlp";

/// Downloader shelling out to yt-dlp
pub struct YtDlpDownloader {
    program: String,
    timeout_secs: u64,
}

impl YtDlpDownloader {
    /// Create a downloader using `yt-dlp` from PATH
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_PROGRAM, DOWNLOAD_TIMEOUT_SECS)
    }

    /// Create a downloader with a custom program and timeout
    pub fn with_settings(program: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            timeout_secs,
        }
    }

    /// Build yt-dlp args for best-quality mp3 extraction
    fn build_args(output_path: &Path, video_url: &str) -> Vec<String> {
        vec![
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            "0".to_string(),
            "--no-playlist".to_string(),
            "-o".to_string(),
            output_path.to_string_lossy().to_string(),
            video_url.to_string(),
        ]
    }

    /// Spawn the yt-dlp process
    fn spawn_ytdlp(&self, args: Vec<String>) -> Result<Child, DownloadError> {
        Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DownloadError::ToolNotFound
                } else {
                    DownloadError::Io(e.to_string())
                }
            })
    }

    /// Find the produced audio file.
    ///
    /// yt-dlp may pick its own extension when post-processing, so when
    /// the requested path is missing the directory is scanned for
    /// anything sharing the output stem.
    async fn locate_output(dir: &Path, requested: PathBuf) -> Result<PathBuf, DownloadError> {
        if requested.exists() {
            return Ok(requested);
        }

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| DownloadError::Io(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DownloadError::Io(e.to_string()))?
        {
            if entry.file_name().to_string_lossy().starts_with(OUTPUT_STEM) {
                return Ok(entry.path());
            }
        }

        Err(DownloadError::AssetMissing)
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioDownloader for YtDlpDownloader {
    async fn download(&self, video_url: &str) -> Result<DownloadedAudio, DownloadError> {
        let dir = TempDir::new().map_err(|e| DownloadError::Io(e.to_string()))?;
        let requested = dir.path().join(format!("{}.mp3", OUTPUT_STEM));

        let args = Self::build_args(&requested, video_url);
        let mut child = self.spawn_ytdlp(args)?;

        let status = match tokio::time::timeout(Duration::from_secs(self.timeout_secs), child.wait())
            .await
        {
            Ok(waited) => waited.map_err(|e| DownloadError::Io(e.to_string()))?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(DownloadError::TimedOut(self.timeout_secs));
            }
        };

        if !status.success() {
            // Read stderr for the error message
            let mut detail = String::new();
            if let Some(mut stderr) = child.stderr.take() {
                use tokio::io::AsyncReadExt;
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf).await;
                detail = String::from_utf8_lossy(&buf).trim().to_string();
            }
            return Err(DownloadError::ProcessFailed(detail));
        }

        let path = Self::locate_output(dir.path(), requested).await?;
        Ok(DownloadedAudio::new(dir, path, AudioMimeType::Mpeg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_args_requests_mp3_extraction() {
        let args = YtDlpDownloader::build_args(Path::new("/tmp/dl/audio.mp3"), "https://youtu.be/x");

        assert_eq!(
            args,
            vec![
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "0",
                "--no-playlist",
                "-o",
                "/tmp/dl/audio.mp3",
                "https://youtu.be/x",
            ]
        );
    }

    #[tokio::test]
    async fn locate_output_prefers_requested_path() {
        let dir = tempfile::tempdir().unwrap();
        let requested = dir.path().join("audio.mp3");
        std::fs::write(&requested, b"x").unwrap();

        let found = YtDlpDownloader::locate_output(dir.path(), requested.clone())
            .await
            .unwrap();

        assert_eq!(found, requested);
    }

    #[tokio::test]
    async fn locate_output_scans_for_matching_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("audio.m4a"), b"x").unwrap();

        let found = YtDlpDownloader::locate_output(dir.path(), dir.path().join("audio.mp3"))
            .await
            .unwrap();

        assert_eq!(found.file_name().and_then(|n| n.to_str()), Some("audio.m4a"));
    }

    #[tokio::test]
    async fn locate_output_errors_when_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("subtitles.srt"), b"x").unwrap();

        let err = YtDlpDownloader::locate_output(dir.path(), dir.path().join("audio.mp3"))
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::AssetMissing));
    }

    #[tokio::test]
    async fn download_reports_missing_tool() {
        let downloader = YtDlpDownloader::with_settings("definitely-not-a-real-tool-7f3a", 5);

        let err = downloader.download("https://example.com").await.unwrap_err();

        assert!(matches!(err, DownloadError::ToolNotFound));
    }

    #[cfg(unix)]
    mod with_fake_tool {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn fake_tool(dir: &Path, script: &str) -> PathBuf {
            let path = dir.join("fake-ytdlp");
            std::fs::write(&path, script).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn download_returns_audio_and_cleans_up_on_drop() {
            let tools = tempfile::tempdir().unwrap();
            // $8 is the value passed to -o
            let tool = fake_tool(tools.path(), "#!/bin/sh\nprintf data > \"$8\"\n");
            let downloader = YtDlpDownloader::with_settings(tool.to_string_lossy(), 5);

            let audio = downloader
                .download("https://example.com/watch?v=x")
                .await
                .unwrap();

            assert!(audio.path().exists());
            assert_eq!(audio.mime_type(), AudioMimeType::Mpeg);

            let dir = audio.dir_path().to_path_buf();
            drop(audio);
            assert!(!dir.exists());
        }

        #[tokio::test]
        async fn download_surfaces_stderr_on_failure() {
            let tools = tempfile::tempdir().unwrap();
            let tool = fake_tool(
                tools.path(),
                "#!/bin/sh\necho 'ERROR: unsupported URL' >&2\nexit 1\n",
            );
            let downloader = YtDlpDownloader::with_settings(tool.to_string_lossy(), 5);

            let err = downloader.download("https://example.com/bad").await.unwrap_err();

            match err {
                DownloadError::ProcessFailed(detail) => {
                    assert!(detail.contains("unsupported URL"))
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[tokio::test]
        async fn download_times_out_on_hung_tool() {
            let tools = tempfile::tempdir().unwrap();
            let tool = fake_tool(tools.path(), "#!/bin/sh\nsleep 5\n");
            let downloader = YtDlpDownloader::with_settings(tool.to_string_lossy(), 1);

            let err = downloader.download("https://example.com/slow").await.unwrap_err();

            assert!(matches!(err, DownloadError::TimedOut(1)));
        }
    }
}
