// components/media_downloader/src/lib.rs
//! Resolve media sources and fetch them with yt-dlp.
//!
//! A source is either a URL (`http://`, `https://`, `www.`) or a local path.
//! Downloads land at a deterministic path under the caller's directory, and
//! an existing file at that path counts as a cache hit. The cache check is
//! existence only: a truncated or corrupt file is returned as is. Two
//! concurrent fetches of the same filename are not coordinated.

mod error;
mod frame;
mod probe;
mod types;
mod utils;
mod ytdlp;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use error::{DownloadError, FetchError, LoadError, ProbeError, ScreenshotError, TimestampError};
pub use frame::{Ffmpeg, FrameExtractor};
pub use probe::{FfProbe, MediaProbe};
pub use types::{MediaDescriptor, MediaFormat, RemoteMetadata, SourceKind, Timestamp};
pub use utils::expand_home;
pub use ytdlp::{Downloader, DownloaderCapability, YtDlp};

use utils::{absolute, locate_download, output_template};

const REMOTE_PREFIXES: [&str; 3] = ["http://", "https://", "www."];

pub struct MediaLoader {
    downloader: DownloaderCapability,
    probe: Arc<dyn MediaProbe + Send + Sync>,
}

impl MediaLoader {
    /// Create a loader using yt-dlp from `PATH` and ffprobe for local durations
    pub fn new(cookies_file: Option<PathBuf>) -> Self {
        Self::with_parts(
            DownloaderCapability::detect(cookies_file),
            Arc::new(FfProbe::default()),
        )
    }

    /// Create a loader with specific collaborators
    pub fn with_parts(
        downloader: DownloaderCapability,
        probe: Arc<dyn MediaProbe + Send + Sync>,
    ) -> Self {
        Self { downloader, probe }
    }

    pub fn can_fetch_remote(&self) -> bool {
        self.downloader.is_available()
    }

    pub fn is_remote(source: &str) -> bool {
        REMOTE_PREFIXES
            .iter()
            .any(|prefix| source.starts_with(prefix))
    }

    /// Describe a URL or local file without downloading anything
    pub async fn resolve(&self, source: &str) -> Result<MediaDescriptor, LoadError> {
        if Self::is_remote(source) {
            self.resolve_remote(source).await
        } else {
            self.resolve_local(source).await
        }
    }

    async fn resolve_remote(&self, url: &str) -> Result<MediaDescriptor, LoadError> {
        tracing::info!("Loading media info from: {}", url);

        let remote_error = |source| LoadError::Remote {
            url: url.to_string(),
            source,
        };

        let metadata = self
            .downloader
            .get()
            .map_err(remote_error)?
            .fetch_metadata(url)
            .await
            .map_err(remote_error)?;

        Ok(MediaDescriptor::remote(url, metadata))
    }

    async fn resolve_local(&self, source: &str) -> Result<MediaDescriptor, LoadError> {
        let inspect_error = |path: &Path, source| LoadError::Inspect {
            path: path.to_path_buf(),
            source,
        };

        let expanded = expand_home(Path::new(source));
        let path = absolute(&expanded).map_err(|e| inspect_error(&expanded, e))?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::FileNotFound(source.to_string()));
            }
            Err(e) => return Err(inspect_error(&path, e)),
        };
        if !metadata.is_file() {
            return Err(LoadError::NotAFile(source.to_string()));
        }

        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::info!("Loading media info from: {}", path.display());

        let duration = match self.probe.duration(&path).await {
            Ok(duration) => duration,
            Err(e) => {
                tracing::warn!("Could not get duration of {}: {}", path.display(), e);
                0.0
            }
        };

        Ok(MediaDescriptor::local(
            path.to_string_lossy(),
            stem,
            duration,
        ))
    }

    /// Download the best audio of `url` as mp3 to `dir/filename`
    pub async fn fetch_audio(
        &self,
        url: &str,
        dir: &Path,
        filename: &str,
        use_cache: bool,
    ) -> Result<PathBuf, FetchError> {
        self.fetch(MediaFormat::Audio, url, dir, filename, use_cache)
            .await
    }

    /// Download the best video and audio of `url` merged into mp4 at `dir/filename`
    pub async fn fetch_video(
        &self,
        url: &str,
        dir: &Path,
        filename: &str,
        use_cache: bool,
    ) -> Result<PathBuf, FetchError> {
        self.fetch(MediaFormat::Video, url, dir, filename, use_cache)
            .await
    }

    async fn fetch(
        &self,
        format: MediaFormat,
        url: &str,
        dir: &Path,
        filename: &str,
        use_cache: bool,
    ) -> Result<PathBuf, FetchError> {
        self.try_fetch(format, url, dir, filename, use_cache)
            .await
            .map_err(|source| FetchError { format, source })
    }

    async fn try_fetch(
        &self,
        format: MediaFormat,
        url: &str,
        dir: &Path,
        filename: &str,
        use_cache: bool,
    ) -> Result<PathBuf, DownloadError> {
        let dir = expand_home(dir);
        tokio::fs::create_dir_all(&dir).await?;
        let output_path = dir.join(filename);

        if use_cache && tokio::fs::try_exists(&output_path).await? {
            tracing::info!("Using cached {}: {}", format, output_path.display());
            return Ok(output_path);
        }

        tracing::info!("Downloading {} from: {}", format, url);

        self.downloader
            .get()?
            .download(url, format, &output_template(&dir, filename))
            .await?;

        let path = locate_download(&output_path, format).await?;
        tracing::info!("{} saved to: {}", format, path.display());
        Ok(path)
    }
}
