// components/media_tool/src/tool.rs
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use media_downloader::{Ffmpeg, FrameExtractor, MediaFormat, MediaLoader, SourceKind};
use serde_json::{json, Value};

use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::request::{InvocationRequest, Plan, ScreenshotPlan};
use crate::result::{InvocationResult, ToolFailure, ToolOutput};

pub const TOOL_NAME: &str = "youtube-dl";

const TOOL_DESCRIPTION: &str =
    "Download audio or video from YouTube with metadata extraction and screenshot capture";

/// Media retrieval exposed as a single callable tool.
///
/// Every call returns an [`InvocationResult`]; nothing a collaborator does,
/// panics included, escapes [`YoutubeDlTool::invoke`].
pub struct YoutubeDlTool {
    config: ToolConfig,
    loader: MediaLoader,
    frames: Arc<dyn FrameExtractor + Send + Sync>,
}

impl YoutubeDlTool {
    /// Build the tool with yt-dlp from `PATH`, ffprobe and ffmpeg
    pub fn new(config: ToolConfig) -> Result<Self, ToolError> {
        let config = config.expanded();
        let loader = MediaLoader::new(config.credentials_file.clone());
        Self::with_parts(config, loader, Arc::new(Ffmpeg::default()))
    }

    pub fn with_parts(
        config: ToolConfig,
        loader: MediaLoader,
        frames: Arc<dyn FrameExtractor + Send + Sync>,
    ) -> Result<Self, ToolError> {
        let config = config.expanded();
        std::fs::create_dir_all(&config.output_dir).map_err(|source| ToolError::OutputDir {
            path: config.output_dir.clone(),
            source,
        })?;

        Ok(Self {
            config,
            loader,
            frames,
        })
    }

    pub fn name(&self) -> &'static str {
        TOOL_NAME
    }

    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// JSON schema of the accepted input, for registration with the host
    pub fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "source": {
                    "type": "string",
                    "description": "YouTube URL or local file path"
                },
                "audio_only": {
                    "type": "boolean",
                    "description": "Download audio only instead of the full video",
                    "default": self.config.audio_only
                },
                "output_filename": {
                    "type": "string",
                    "description": "Name of the downloaded file inside the output directory"
                },
                "use_cache": {
                    "type": "boolean",
                    "description": "Reuse an existing file with the same name",
                    "default": true
                },
                "capture_screenshot": {
                    "type": "boolean",
                    "description": "Extract a single frame",
                    "default": false
                },
                "screenshot_timestamp": {
                    "type": "string",
                    "description": "Frame position as HH:MM:SS, required when capture_screenshot is true",
                    "pattern": "^[0-9]+:[0-5][0-9]:[0-5][0-9](\\.[0-9]+)?$"
                },
                "screenshot_filename": {
                    "type": "string",
                    "description": "Name of the screenshot file inside the output directory"
                }
            },
            "required": ["source"]
        })
    }

    /// Run one invocation from the host's raw JSON input
    pub async fn execute(&self, input: Value) -> InvocationResult {
        match serde_json::from_value::<InvocationRequest>(input) {
            Ok(request) => self.invoke(request).await,
            Err(e) => self.failure(None, ToolError::validation(format!("Invalid input: {}", e))),
        }
    }

    pub async fn invoke(&self, request: InvocationRequest) -> InvocationResult {
        let source = request.source.clone();
        let outcome = AssertUnwindSafe(self.run(request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ToolError::Panicked(panic_message(panic.as_ref()))));

        match outcome {
            Ok(output) => {
                tracing::info!("Download complete: {}", output.file_path.display());
                InvocationResult::Success(output)
            }
            Err(error) => self.failure(source.as_deref(), error),
        }
    }

    async fn run(&self, request: InvocationRequest) -> Result<ToolOutput, ToolError> {
        let plan = request.validate(self.config.audio_only)?;

        tracing::info!("Loading media info from: {}", plan.source);
        let mut metadata = self.loader.resolve(&plan.source).await?;

        let file_path = match metadata.kind {
            SourceKind::Remote => {
                let format = if plan.audio_only {
                    MediaFormat::Audio
                } else {
                    MediaFormat::Video
                };
                let path = self.fetch(format, &metadata.source, &plan).await?;
                match format {
                    MediaFormat::Audio => metadata.audio_path = Some(path.clone()),
                    MediaFormat::Video => metadata.video_path = Some(path.clone()),
                }
                path
            }
            SourceKind::Local => PathBuf::from(&metadata.source),
        };

        let screenshot_path = match &plan.screenshot {
            Some(screenshot) => Some(self.capture(&file_path, screenshot).await?),
            None => None,
        };

        Ok(ToolOutput {
            file_path,
            metadata,
            screenshot_path,
        })
    }

    async fn fetch(
        &self,
        format: MediaFormat,
        url: &str,
        plan: &Plan,
    ) -> Result<PathBuf, ToolError> {
        let filename = plan
            .output_filename
            .as_deref()
            .unwrap_or(format.default_filename());
        let dir = &self.config.output_dir;

        let path = match format {
            MediaFormat::Audio => {
                self.loader
                    .fetch_audio(url, dir, filename, plan.use_cache)
                    .await?
            }
            MediaFormat::Video => {
                self.loader
                    .fetch_video(url, dir, filename, plan.use_cache)
                    .await?
            }
        };
        Ok(path)
    }

    async fn capture(&self, media: &Path, screenshot: &ScreenshotPlan) -> Result<PathBuf, ToolError> {
        let mut output = self.config.output_dir.join(&screenshot.filename);
        if output == media {
            output = self
                .config
                .output_dir
                .join(format!("{}.jpg", screenshot.filename));
        }

        tracing::info!("Capturing screenshot at {}", screenshot.timestamp);
        Ok(self
            .frames
            .capture(media, &screenshot.timestamp, &output)
            .await?)
    }

    fn failure(&self, source: Option<&str>, error: ToolError) -> InvocationResult {
        let kind = error.kind();
        let source = source.unwrap_or("<no source>");
        if kind.is_expected() {
            tracing::error!("Download failed ({}) for {}: {}", kind, source, error);
        } else {
            tracing::error!("Unexpected error for {}: {:?}", source, error);
        }

        InvocationResult::Failure(ToolFailure {
            message: error.to_string(),
            kind,
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
