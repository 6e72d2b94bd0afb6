//! YouTube video identifier extraction

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static ID_AFTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|youtu\.be/|embed/)([a-zA-Z0-9_-]{11})").unwrap());

/// Eleven character YouTube video identifier.
///
/// Extraction is informational only. Download requests pass the full
/// URL through to the downloader untouched, so a URL this regex does
/// not recognize still works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    /// Extract a video identifier from a YouTube URL, if present
    pub fn extract(url: &str) -> Option<Self> {
        ID_AFTER_MARKER
            .captures(url)
            .map(|caps| Self(caps[1].to_string()))
    }

    /// Get the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
