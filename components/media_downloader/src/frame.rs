// components/media_downloader/src/frame.rs
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ScreenshotError;
use crate::types::Timestamp;
use crate::utils::{expand_home, stderr_tail};

#[async_trait]
pub trait FrameExtractor {
    /// Write the frame at `timestamp` of `video` to `output`, replacing any existing file
    async fn capture(
        &self,
        video: &Path,
        timestamp: &Timestamp,
        output: &Path,
    ) -> Result<PathBuf, ScreenshotError>;
}

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl FrameExtractor for Ffmpeg {
    async fn capture(
        &self,
        video: &Path,
        timestamp: &Timestamp,
        output: &Path,
    ) -> Result<PathBuf, ScreenshotError> {
        let video = expand_home(video);
        let output = expand_home(output);

        if !video.is_file() {
            return Err(ScreenshotError::VideoNotFound(video));
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ScreenshotError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tracing::info!(
            "Capturing screenshot at {} from: {}",
            timestamp,
            video.display()
        );

        let result = Command::new(&self.program)
            .arg("-ss")
            .arg(timestamp.as_str())
            .arg("-i")
            .arg(&video)
            .args(["-frames:v", "1", "-q:v", "2", "-y"])
            .arg(&output)
            .output()
            .await
            .map_err(ScreenshotError::Spawn)?;

        if !result.status.success() {
            return Err(ScreenshotError::CommandFailed {
                status: result.status,
                stderr: stderr_tail(&result.stderr),
            });
        }

        tracing::info!("Screenshot saved to: {}", output.display());
        Ok(output)
    }
}
