use std::str::FromStr;

use crate::error::DownloadError;

/// The formats the remote service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3_128,
    Mp3_320,
    Flac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 3] = [Self::Mp3_128, Self::Mp3_320, Self::Flac];

    /// File extension the finished download carries.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3_128 | Self::Mp3_320 => "mp3",
            Self::Flac => "flac",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Mp3_128 => "mp3-128",
            Self::Mp3_320 => "mp3-320",
            Self::Flac => "flac",
        };
        write!(f, "{name}")
    }
}

impl FromStr for AudioFormat {
    type Err = DownloadError;

    /// Parse a `format[-bitrate]` request. Rejected before any browser or
    /// network work begins.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (format, bitrate) = match lower.split_once('-') {
            Some((f, b)) => (f, Some(b)),
            None => (lower.as_str(), None),
        };
        match (format, bitrate) {
            ("mp3", Some("128")) => Ok(Self::Mp3_128),
            ("mp3", Some("320")) | ("mp3", None) => Ok(Self::Mp3_320),
            ("mp3", Some(other)) => Err(DownloadError::UnsupportedBitrate(other.to_string())),
            ("flac", None) => Ok(Self::Flac),
            ("flac", Some(other)) => Err(DownloadError::UnsupportedBitrate(other.to_string())),
            _ => Err(DownloadError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}
