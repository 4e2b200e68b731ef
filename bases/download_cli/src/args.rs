// bases/download_cli/src/args.rs
use clap::Parser;
use media_tool::{default_output_dir, InvocationRequest, ToolConfig};
use std::path::PathBuf;

/// Download audio or video from YouTube, or inspect a local media file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// URL or local file to retrieve
    pub source: String,

    /// Directory to store downloaded files (default: ~/downloads)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Download the full video instead of audio only
    #[arg(long, conflicts_with = "audio")]
    pub video: bool,

    /// Download audio only
    #[arg(long)]
    pub audio: bool,

    /// Name of the downloaded file inside the output directory
    #[arg(short = 'f', long)]
    pub output_filename: Option<String>,

    /// Download again even if the file already exists
    #[arg(long)]
    pub no_cache: bool,

    /// Capture a screenshot at this position
    #[arg(long, value_name = "HH:MM:SS")]
    pub screenshot_at: Option<String>,

    /// Name of the screenshot file inside the output directory
    #[arg(long, requires = "screenshot_at")]
    pub screenshot_filename: Option<String>,

    /// Cookies file for authenticated downloads
    #[arg(long, value_name = "FILE")]
    pub cookies: Option<PathBuf>,

    /// Print the raw result as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            output_dir: self.output_dir.clone().unwrap_or_else(default_output_dir),
            audio_only: true,
            credentials_file: self.cookies.clone(),
        }
    }

    pub fn request(&self) -> InvocationRequest {
        let mut request = InvocationRequest::new(&self.source).use_cache(!self.no_cache);

        if self.video {
            request = request.audio_only(false);
        } else if self.audio {
            request = request.audio_only(true);
        }
        if let Some(filename) = &self.output_filename {
            request = request.output_filename(filename);
        }
        if let Some(timestamp) = &self.screenshot_at {
            request = request.screenshot_at(timestamp);
        }
        if let Some(filename) = &self.screenshot_filename {
            request = request.screenshot_filename(filename);
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("youtube-dl-tool").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&["https://youtube.com/watch?v=test"]);

        let config = args.tool_config();
        assert_eq!(config.output_dir, default_output_dir());
        assert!(config.audio_only);
        assert_eq!(config.credentials_file, None);

        let request = args.request();
        assert_eq!(request.source.as_deref(), Some("https://youtube.com/watch?v=test"));
        assert_eq!(request.audio_only, None);
        assert!(request.use_cache);
        assert!(!request.capture_screenshot);
    }

    #[test]
    fn video_with_screenshot() {
        let args = parse(&[
            "https://youtube.com/watch?v=test",
            "--video",
            "-f",
            "talk.mp4",
            "--screenshot-at",
            "00:05:00",
            "--no-cache",
        ]);

        let request = args.request();
        assert_eq!(request.audio_only, Some(false));
        assert_eq!(request.output_filename.as_deref(), Some("talk.mp4"));
        assert!(request.capture_screenshot);
        assert_eq!(request.screenshot_timestamp.as_deref(), Some("00:05:00"));
        assert!(!request.use_cache);
    }

    #[test]
    fn output_dir_and_cookies() {
        let args = parse(&[
            "/tmp/clip.mp4",
            "--output-dir",
            "/tmp/out",
            "--cookies",
            "/tmp/cookies.txt",
        ]);

        let config = args.tool_config();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.credentials_file, Some(PathBuf::from("/tmp/cookies.txt")));
    }

    #[test]
    fn video_and_audio_conflict() {
        let result = Args::try_parse_from([
            "youtube-dl-tool",
            "https://youtube.com/watch?v=test",
            "--video",
            "--audio",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn screenshot_filename_needs_timestamp() {
        let result = Args::try_parse_from([
            "youtube-dl-tool",
            "https://youtube.com/watch?v=test",
            "--screenshot-filename",
            "cover.jpg",
        ]);
        assert!(result.is_err());
    }
}
