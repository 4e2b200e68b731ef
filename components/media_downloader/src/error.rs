// components/media_downloader/src/error.rs
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::types::MediaFormat;

/// Failures of the external download program itself
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("yt-dlp is not installed")]
    NotConfigured,

    #[error("yt-dlp exited with {status}: {stderr}")]
    CommandFailed { status: ExitStatus, stderr: String },

    #[error("Playlists are not supported")]
    Playlist,

    #[error("Invalid yt-dlp output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("Could not find downloaded {0} file")]
    OutputMissing(MediaFormat),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failure to turn a source string into a descriptor
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Failed to load URL {url}: {source}")]
    Remote {
        url: String,
        #[source]
        source: DownloadError,
    },

    #[error("Failed to inspect {}: {source}", path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
#[error("Failed to download {format}: {source}")]
pub struct FetchError {
    pub format: MediaFormat,
    #[source]
    pub source: DownloadError,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run ffprobe: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("ffprobe exited with {status}: {stderr}")]
    CommandFailed { status: ExitStatus, stderr: String },

    #[error("invalid ffprobe output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("ffprobe reported no duration")]
    MissingDuration,

    #[error("invalid duration '{0}'")]
    InvalidDuration(String),
}

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("Video file not found: {}", .0.display())]
    VideoNotFound(PathBuf),

    #[error("Failed to create screenshot directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to capture screenshot: could not run ffmpeg: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to capture screenshot: ffmpeg exited with {status}: {stderr}")]
    CommandFailed { status: ExitStatus, stderr: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid timestamp '{0}', expected HH:MM:SS")]
pub struct TimestampError(pub String);
