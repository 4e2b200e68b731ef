// components/media_downloader/src/ytdlp.rs
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::DownloadError;
use crate::types::{MediaFormat, RemoteMetadata};
use crate::utils::{expand_home, stderr_tail};

const AUDIO_FORMAT: &str = "bestaudio/best";
const AUDIO_CODEC: &str = "mp3";
const AUDIO_QUALITY: &str = "192K";
const VIDEO_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";
const VIDEO_CONTAINER: &str = "mp4";

#[async_trait]
pub trait Downloader {
    /// Fetch metadata about a URL without downloading it
    async fn fetch_metadata(&self, url: &str) -> Result<RemoteMetadata, DownloadError>;

    /// Download `url` as `format`, writing to a yt-dlp output template
    /// of the form `<dir>/<stem>.%(ext)s`
    async fn download(
        &self,
        url: &str,
        format: MediaFormat,
        output_template: &Path,
    ) -> Result<(), DownloadError>;
}

/// The download program, decided once when the loader is built
#[derive(Clone)]
pub enum DownloaderCapability {
    Available(Arc<dyn Downloader + Send + Sync>),
    NotConfigured,
}

impl DownloaderCapability {
    /// Look for yt-dlp on `PATH`
    pub fn detect(cookies_file: Option<PathBuf>) -> Self {
        match YtDlp::detect(cookies_file) {
            Some(ytdlp) => Self::Available(Arc::new(ytdlp)),
            None => Self::NotConfigured,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub(crate) fn get(&self) -> Result<&(dyn Downloader + Send + Sync), DownloadError> {
        match self {
            Self::Available(downloader) => Ok(downloader.as_ref()),
            Self::NotConfigured => Err(DownloadError::NotConfigured),
        }
    }
}

impl fmt::Debug for DownloaderCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Available"),
            Self::NotConfigured => f.write_str("NotConfigured"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    cookies_file: Option<PathBuf>,
}

impl YtDlp {
    pub fn detect(cookies_file: Option<PathBuf>) -> Option<Self> {
        match which::which("yt-dlp") {
            Ok(program) => Some(Self::new(program, cookies_file)),
            Err(e) => {
                tracing::warn!("yt-dlp not found, remote sources are unavailable: {}", e);
                None
            }
        }
    }

    /// Use a specific yt-dlp binary. A cookies file that does not exist is ignored.
    pub fn new(program: impl Into<PathBuf>, cookies_file: Option<PathBuf>) -> Self {
        let cookies_file = cookies_file
            .map(|path| expand_home(&path))
            .filter(|path| {
                let exists = path.exists();
                if !exists {
                    tracing::warn!("Ignoring missing cookies file: {}", path.display());
                }
                exists
            });

        Self {
            program: program.into(),
            cookies_file,
        }
    }

    pub fn cookies_file(&self) -> Option<&Path> {
        self.cookies_file.as_deref()
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(base_args(self.cookies_file.as_deref()));
        command
    }

    async fn run(&self, mut command: Command) -> Result<Output, DownloadError> {
        let output = command.output().await?;
        if !output.status.success() {
            return Err(DownloadError::CommandFailed {
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(output)
    }
}

#[async_trait]
impl Downloader for YtDlp {
    async fn fetch_metadata(&self, url: &str) -> Result<RemoteMetadata, DownloadError> {
        tracing::debug!("Fetching metadata for {}", url);

        let mut command = self.command();
        command.args(metadata_args()).arg(url);
        let output = self.run(command).await?;

        parse_metadata(&output.stdout)
    }

    async fn download(
        &self,
        url: &str,
        format: MediaFormat,
        output_template: &Path,
    ) -> Result<(), DownloadError> {
        tracing::debug!(
            "Downloading {} from {} to {}",
            format,
            url,
            output_template.display()
        );

        let mut command = self.command();
        command
            .args(download_args(format))
            .arg("-o")
            .arg(output_template)
            .arg(url);
        self.run(command).await?;

        Ok(())
    }
}

fn base_args(cookies_file: Option<&Path>) -> Vec<String> {
    let mut args = vec![
        "--no-playlist".to_string(),
        "--quiet".to_string(),
        "--no-warnings".to_string(),
    ];
    if let Some(cookies) = cookies_file {
        args.push("--cookies".to_string());
        args.push(cookies.to_string_lossy().into_owned());
    }
    args
}

fn metadata_args() -> [&'static str; 4] {
    ["--dump-single-json", "--skip-download", "--format", AUDIO_FORMAT]
}

/// A bare playlist URL still yields a playlist record despite `--no-playlist`
fn parse_metadata(stdout: &[u8]) -> Result<RemoteMetadata, DownloadError> {
    let value: serde_json::Value = serde_json::from_slice(stdout)?;
    if value.get("_type").and_then(|t| t.as_str()) == Some("playlist") {
        return Err(DownloadError::Playlist);
    }
    Ok(serde_json::from_value(value)?)
}

// The loader owns the cache decision, so whatever yt-dlp finds on disk is replaced
fn download_args(format: MediaFormat) -> Vec<&'static str> {
    match format {
        MediaFormat::Audio => vec![
            "--force-overwrites",
            "--format",
            AUDIO_FORMAT,
            "--extract-audio",
            "--audio-format",
            AUDIO_CODEC,
            "--audio-quality",
            AUDIO_QUALITY,
        ],
        MediaFormat::Video => vec![
            "--force-overwrites",
            "--format",
            VIDEO_FORMAT,
            "--merge-output-format",
            VIDEO_CONTAINER,
        ],
    }
}

#[cfg(test)]
pub mod stub {
    use super::*;
    use std::sync::Mutex;

    /// Records calls and writes a file with the given extension next to the template
    pub struct DownloaderStub {
        pub metadata: RemoteMetadata,
        pub written_extension: Option<&'static str>,
        pub downloads: Mutex<Vec<(MediaFormat, PathBuf)>>,
    }

    impl DownloaderStub {
        pub fn writing(extension: &'static str) -> Self {
            Self {
                metadata: RemoteMetadata {
                    id: Some("test123".to_string()),
                    title: Some("Test Video".to_string()),
                    duration: Some(300.0),
                    description: Some("Test description".to_string()),
                    uploader: Some("Test Uploader".to_string()),
                },
                written_extension: Some(extension),
                downloads: Mutex::new(Vec::new()),
            }
        }

        pub fn writing_nothing() -> Self {
            Self {
                written_extension: None,
                ..Self::writing("")
            }
        }

        pub fn download_count(&self) -> usize {
            self.downloads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Downloader for DownloaderStub {
        async fn fetch_metadata(&self, _url: &str) -> Result<RemoteMetadata, DownloadError> {
            Ok(self.metadata.clone())
        }

        async fn download(
            &self,
            _url: &str,
            format: MediaFormat,
            output_template: &Path,
        ) -> Result<(), DownloadError> {
            self.downloads
                .lock()
                .unwrap()
                .push((format, output_template.to_path_buf()));

            if let Some(extension) = self.written_extension {
                let template = output_template.to_string_lossy();
                let path = template.replace(".%(ext)s", extension);
                tokio::fs::write(path, b"media").await?;
            }
            Ok(())
        }
    }
}
