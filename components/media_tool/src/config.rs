// components/media_tool/src/config.rs
use std::path::PathBuf;

use media_downloader::expand_home;
use serde::Deserialize;

/// Tool configuration, fixed for the lifetime of a tool instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Directory downloads and screenshots are written to
    pub output_dir: PathBuf,

    /// Download audio only unless a request says otherwise
    pub audio_only: bool,

    /// Netscape cookies file handed to yt-dlp for authenticated access
    #[serde(alias = "cookies_file")]
    pub credentials_file: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            audio_only: true,
            credentials_file: None,
        }
    }
}

impl ToolConfig {
    /// Expand `~` in every configured path
    pub fn expanded(self) -> Self {
        Self {
            output_dir: expand_home(&self.output_dir),
            credentials_file: self.credentials_file.map(|path| expand_home(&path)),
            ..self
        }
    }
}

/// `~/downloads`, or `./downloads` when there is no home directory
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("downloads"))
        .unwrap_or_else(|| PathBuf::from("downloads"))
}
