// components/media_tool/src/request.rs
use std::path::Path;

use media_downloader::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "webm", "mkv", "mov"];
const SCREENSHOT_EXTENSION: &str = "jpg";
const DEFAULT_SCREENSHOT_FILENAME: &str = "screenshot.jpg";

/// Input of one tool invocation as sent by the host framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvocationRequest {
    /// URL or local file path
    #[serde(alias = "url")]
    pub source: Option<String>,

    /// Overrides the configured default when set
    pub audio_only: Option<bool>,

    pub output_filename: Option<String>,

    pub use_cache: bool,

    pub capture_screenshot: bool,

    /// `HH:MM:SS`, required when `capture_screenshot` is set
    #[serde(alias = "screenshot_time")]
    pub screenshot_timestamp: Option<String>,

    pub screenshot_filename: Option<String>,
}

impl Default for InvocationRequest {
    fn default() -> Self {
        Self {
            source: None,
            audio_only: None,
            output_filename: None,
            use_cache: true,
            capture_screenshot: false,
            screenshot_timestamp: None,
            screenshot_filename: None,
        }
    }
}

impl InvocationRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn audio_only(mut self, audio_only: bool) -> Self {
        self.audio_only = Some(audio_only);
        self
    }

    pub fn output_filename(mut self, filename: impl Into<String>) -> Self {
        self.output_filename = Some(filename.into());
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn screenshot_at(mut self, timestamp: impl Into<String>) -> Self {
        self.capture_screenshot = true;
        self.screenshot_timestamp = Some(timestamp.into());
        self
    }

    pub fn screenshot_filename(mut self, filename: impl Into<String>) -> Self {
        self.screenshot_filename = Some(filename.into());
        self
    }

    /// Check the request and settle defaults. No I/O happens here.
    pub(crate) fn validate(self, default_audio_only: bool) -> Result<Plan, ToolError> {
        let source = self
            .source
            .map(|source| source.trim().to_string())
            .filter(|source| !source.is_empty())
            .ok_or_else(|| ToolError::validation("Missing required parameter: source"))?;

        let output_filename = self
            .output_filename
            .map(|name| checked_filename("output_filename", &name))
            .transpose()?;

        let screenshot = if self.capture_screenshot {
            let raw = self
                .screenshot_timestamp
                .filter(|timestamp| !timestamp.trim().is_empty())
                .ok_or_else(|| {
                    ToolError::validation(
                        "screenshot_timestamp required when capture_screenshot is true",
                    )
                })?;
            let timestamp = raw
                .parse::<Timestamp>()
                .map_err(|e| ToolError::validation(e.to_string()))?;
            let filename = match self.screenshot_filename {
                Some(name) => checked_filename("screenshot_filename", &name)?,
                None => default_screenshot_filename(output_filename.as_deref()),
            };
            Some(ScreenshotPlan {
                timestamp,
                filename,
            })
        } else {
            None
        };

        Ok(Plan {
            source,
            audio_only: self.audio_only.unwrap_or(default_audio_only),
            output_filename,
            use_cache: self.use_cache,
            screenshot,
        })
    }
}

/// A validated request
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Plan {
    pub source: String,
    pub audio_only: bool,
    pub output_filename: Option<String>,
    pub use_cache: bool,
    pub screenshot: Option<ScreenshotPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScreenshotPlan {
    pub timestamp: Timestamp,
    pub filename: String,
}

/// Strip path separators and reserved characters so the name stays inside the output directory
fn checked_filename(field: &str, name: &str) -> Result<String, ToolError> {
    let sanitized = sanitize_filename::sanitize(name.trim());
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return Err(ToolError::validation(format!(
            "{field} must name a file, got '{name}'"
        )));
    }
    Ok(sanitized)
}

/// Screenshot name derived from the media filename: a known video extension
/// is swapped for `.jpg`, anything else gets `.jpg` appended
pub(crate) fn default_screenshot_filename(output_filename: Option<&str>) -> String {
    let Some(name) = output_filename else {
        return DEFAULT_SCREENSHOT_FILENAME.to_string();
    };

    let path = Path::new(name);
    let is_video = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

    if is_video {
        path.with_extension(SCREENSHOT_EXTENSION)
            .to_string_lossy()
            .into_owned()
    } else {
        format!("{name}.{SCREENSHOT_EXTENSION}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[test]
    fn defaults_from_json() {
        let request: InvocationRequest =
            serde_json::from_str(r#"{"url": "https://youtube.com/watch?v=test"}"#).unwrap();

        assert_eq!(request.source.as_deref(), Some("https://youtube.com/watch?v=test"));
        assert_eq!(request.audio_only, None);
        assert!(request.use_cache);
        assert!(!request.capture_screenshot);
    }

    #[test]
    fn screenshot_time_alias() {
        let request: InvocationRequest = serde_json::from_str(
            r#"{"source": "/tmp/clip.mp4", "capture_screenshot": true, "screenshot_time": "00:05:00"}"#,
        )
        .unwrap();

        assert_eq!(request.screenshot_timestamp.as_deref(), Some("00:05:00"));
    }

    #[rstest]
    #[case(InvocationRequest::default())]
    #[case(InvocationRequest::new(""))]
    #[case(InvocationRequest::new("   "))]
    fn missing_source(#[case] request: InvocationRequest) {
        assert_matches!(
            request.validate(true),
            Err(ToolError::Validation(message)) if message.contains("source")
        );
    }

    #[test]
    fn screenshot_requires_timestamp() {
        let mut request = InvocationRequest::new("https://youtube.com/watch?v=test");
        request.capture_screenshot = true;

        assert_matches!(
            request.validate(true),
            Err(ToolError::Validation(message)) if message.contains("screenshot_timestamp required")
        );
    }

    #[test]
    fn screenshot_rejects_malformed_timestamp() {
        let request = InvocationRequest::new("https://youtube.com/watch?v=test").screenshot_at("5 minutes");

        assert_matches!(
            request.validate(true),
            Err(ToolError::Validation(message)) if message.contains("5 minutes")
        );
    }

    #[test]
    fn timestamp_without_capture_is_ignored() {
        let mut request = InvocationRequest::new("https://youtube.com/watch?v=test");
        request.screenshot_timestamp = Some("garbage".to_string());

        let plan = request.validate(true).unwrap();
        assert_eq!(plan.screenshot, None);
    }

    #[rstest]
    #[case(None, true, true)]
    #[case(None, false, false)]
    #[case(Some(false), true, false)]
    #[case(Some(true), false, true)]
    fn audio_only_override(
        #[case] requested: Option<bool>,
        #[case] configured: bool,
        #[case] expected: bool,
    ) {
        let mut request = InvocationRequest::new("https://youtube.com/watch?v=test");
        request.audio_only = requested;

        assert_eq!(request.validate(configured).unwrap().audio_only, expected);
    }

    #[test]
    fn output_filename_cannot_escape_directory() {
        let plan = InvocationRequest::new("https://youtube.com/watch?v=test")
            .output_filename("../../etc/passwd")
            .validate(true)
            .unwrap();

        let filename = plan.output_filename.unwrap();
        assert!(!filename.contains('/'));
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case("///")]
    fn output_filename_must_name_a_file(#[case] name: &str) {
        let request = InvocationRequest::new("https://youtube.com/watch?v=test").output_filename(name);
        assert_matches!(request.validate(true), Err(ToolError::Validation(_)));
    }

    #[rstest]
    #[case(None, "screenshot.jpg")]
    #[case(Some("talk.mp4"), "talk.jpg")]
    #[case(Some("talk.MKV"), "talk.jpg")]
    #[case(Some("talk.webm"), "talk.jpg")]
    #[case(Some("talk.mp3"), "talk.mp3.jpg")]
    #[case(Some("talk"), "talk.jpg")]
    fn screenshot_filename_derivation(#[case] output: Option<&str>, #[case] expected: &str) {
        assert_eq!(default_screenshot_filename(output), expected);
    }

    #[test]
    fn explicit_screenshot_filename_wins() {
        let plan = InvocationRequest::new("https://youtube.com/watch?v=test")
            .output_filename("talk.mp4")
            .screenshot_at("00:01:00")
            .screenshot_filename("cover.png")
            .validate(false)
            .unwrap();

        let screenshot = plan.screenshot.unwrap();
        assert_eq!(screenshot.filename, "cover.png");
        assert_eq!(screenshot.timestamp.as_str(), "00:01:00");
    }
}
