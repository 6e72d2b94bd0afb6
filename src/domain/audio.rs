//! Audio MIME type value object

use std::fmt;

/// Supported audio MIME types.
/// The downloader always produces MP3; the other variants cover the
/// containers yt-dlp may fall back to when re-encoding is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    Mpeg,
    Mp4,
    Ogg,
    Webm,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mpeg => "audio/mpeg",
            Self::Mp4 => "audio/mp4",
            Self::Ogg => "audio/ogg",
            Self::Webm => "audio/webm",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mpeg => "mp3",
            Self::Mp4 => "m4a",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
        }
    }

    /// Parse from a MIME string, if recognized
    pub fn from_mime(s: &str) -> Option<Self> {
        match s {
            "audio/mpeg" | "audio/mp3" => Some(Self::Mpeg),
            "audio/mp4" => Some(Self::Mp4),
            "audio/ogg" => Some(Self::Ogg),
            "audio/webm" => Some(Self::Webm),
            _ => None,
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for AudioMimeType {
    fn default() -> Self {
        Self::Mpeg
    }
}
