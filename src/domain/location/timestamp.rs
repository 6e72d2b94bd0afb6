//! Canonical timestamp value object

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EXACT_HMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").unwrap());

static EXACT_MS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());

static SECONDS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

static EMBEDDED_HMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})").unwrap());

static EMBEDDED_MS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").unwrap());

/// Fallback used whenever no time pattern can be recognized
const ZERO_TIMESTAMP: &str = "00:00:00";

/// Value object for a canonical `HH:MM:SS` timestamp.
///
/// The model's reply format is not contractually guaranteed, so
/// construction is defensive: [`Timestamp::normalize`] accepts any
/// string and always yields a usable value, degrading to `00:00:00`
/// when nothing time-shaped can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    /// Coerce a loosely formatted time string into `HH:MM:SS`.
    ///
    /// Rules are tried in order and the first match wins:
    /// 1. exact `HH:MM:SS` is returned unchanged
    /// 2. exact `M:SS` / `MM:SS` becomes `00:MM:SS`
    /// 3. a bare digit string is read as whole seconds and converted
    /// 4. an embedded `H:MM:SS` anywhere in the string is extracted
    /// 5. an embedded `M:SS` anywhere in the string is extracted
    /// 6. anything else becomes `00:00:00`
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();

        if EXACT_HMS.is_match(trimmed) {
            return Self(trimmed.to_string());
        }

        if let Some(caps) = EXACT_MS.captures(trimmed) {
            return Self(format!("00:{:0>2}:{}", &caps[1], &caps[2]));
        }

        if SECONDS_ONLY.is_match(trimmed) {
            return match trimmed.parse::<u64>() {
                Ok(total) => Self(Self::render_seconds(total)),
                Err(_) => Self::zero(),
            };
        }

        if let Some(caps) = EMBEDDED_HMS.captures(trimmed) {
            return Self(format!("{:0>2}:{}:{}", &caps[1], &caps[2], &caps[3]));
        }

        if let Some(caps) = EMBEDDED_MS.captures(trimmed) {
            return Self(format!("00:{:0>2}:{}", &caps[1], &caps[2]));
        }

        Self::zero()
    }

    /// The `00:00:00` fallback timestamp
    pub fn zero() -> Self {
        Self(ZERO_TIMESTAMP.to_string())
    }

    /// Render a seconds count as `HH:MM:SS`.
    /// The hour field is not clamped, so 100 hours and above widen it
    /// past two digits.
    fn render_seconds(total: u64) -> String {
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }

    /// Get the timestamp string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the timestamp string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
