// components/media_downloader/src/types.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Remote,
    Local,
}

/// What a remote fetch should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Audio,
    Video,
}

impl MediaFormat {
    /// Filename used when the caller does not ask for one
    pub fn default_filename(self) -> &'static str {
        match self {
            MediaFormat::Audio => "audio.mp3",
            MediaFormat::Video => "video.mp4",
        }
    }

    /// Extensions yt-dlp may leave behind when post-processing did not
    /// produce the exact requested name, in probe order
    pub fn fallback_extensions(self) -> &'static [&'static str] {
        match self {
            MediaFormat::Audio => &[".mp3", ".m4a", ".opus", ".wav"],
            MediaFormat::Video => &[".mp4", ".webm", ".mkv"],
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaFormat::Audio => f.write_str("audio"),
            MediaFormat::Video => f.write_str("video"),
        }
    }
}

/// Descriptive record for one resolved source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Original URL, or absolute path for local files
    pub source: String,

    pub kind: SourceKind,

    pub title: String,

    pub id: String,

    /// Duration in seconds, 0 when unknown
    pub duration: f64,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub uploader: String,

    /// Set once an audio fetch has succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<PathBuf>,

    /// Set once a video fetch has succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<PathBuf>,
}

impl MediaDescriptor {
    pub fn local(source: impl Into<String>, stem: impl Into<String>, duration: f64) -> Self {
        let stem = stem.into();
        Self {
            source: source.into(),
            kind: SourceKind::Local,
            title: stem.clone(),
            id: stem,
            duration: sanitize_duration(duration),
            description: String::new(),
            uploader: String::new(),
            audio_path: None,
            video_path: None,
        }
    }

    pub fn remote(url: impl Into<String>, metadata: RemoteMetadata) -> Self {
        let url = url.into();
        Self {
            id: metadata.id.unwrap_or_else(|| url.clone()),
            title: metadata.title.unwrap_or_else(|| "Unknown".to_string()),
            duration: sanitize_duration(metadata.duration.unwrap_or_default()),
            description: metadata.description.unwrap_or_default(),
            uploader: metadata.uploader.unwrap_or_default(),
            source: url,
            kind: SourceKind::Remote,
            audio_path: None,
            video_path: None,
        }
    }
}

fn sanitize_duration(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Subset of the yt-dlp info dictionary the descriptor is built from
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteMetadata {
    pub id: Option<String>,
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub description: Option<String>,
    pub uploader: Option<String>,
}

/// Seek position in `HH:MM:SS` form, optionally with fractional seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TimestampError(s.to_string());
        let trimmed = s.trim();

        let mut parts = trimmed.split(':');
        let (Some(hours), Some(minutes), Some(seconds), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let (whole_seconds, fraction) = match seconds.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (seconds, None),
        };

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        let below_sixty = |part: &str| part.len() == 2 && all_digits(part) && part < "60";

        if !all_digits(hours) || !below_sixty(minutes) || !below_sixty(whole_seconds) {
            return Err(invalid());
        }
        if fraction.is_some_and(|f| !all_digits(f)) {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
