// components/media_downloader/src/probe.rs
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::ProbeError;
use crate::utils::stderr_tail;

#[async_trait]
pub trait MediaProbe {
    /// Duration of a local media file in seconds
    async fn duration(&self, path: &Path) -> Result<f64, ProbeError>;
}

#[derive(Debug, Clone)]
pub struct FfProbe {
    program: PathBuf,
}

impl FfProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl MediaProbe for FfProbe {
    async fn duration(&self, path: &Path) -> Result<f64, ProbeError> {
        let output = Command::new(&self.program)
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(path)
            .output()
            .await
            .map_err(ProbeError::Spawn)?;

        if !output.status.success() {
            return Err(ProbeError::CommandFailed {
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }

        parse_duration(&output.stdout)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    // ffprobe prints numbers as strings
    duration: Option<String>,
}

fn parse_duration(stdout: &[u8]) -> Result<f64, ProbeError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)?;
    let raw = probe
        .format
        .and_then(|format| format.duration)
        .ok_or(ProbeError::MissingDuration)?;

    raw.trim()
        .parse()
        .map_err(|_| ProbeError::InvalidDuration(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_duration() {
        let stdout = br#"{ "format": { "duration": "183.456000" } }"#;
        assert_eq!(parse_duration(stdout).unwrap(), 183.456);
    }

    #[test]
    fn test_parse_missing_duration() {
        assert_matches!(
            parse_duration(br#"{ "format": {} }"#),
            Err(ProbeError::MissingDuration)
        );
        assert_matches!(parse_duration(br#"{}"#), Err(ProbeError::MissingDuration));
    }

    #[test]
    fn test_parse_garbage() {
        assert_matches!(parse_duration(b"not json"), Err(ProbeError::InvalidOutput(_)));
        assert_matches!(
            parse_duration(br#"{ "format": { "duration": "N/A" } }"#),
            Err(ProbeError::InvalidDuration(raw)) if raw == "N/A"
        );
    }

    #[tokio::test]
    async fn test_missing_program() {
        let probe = FfProbe::new("/nonexistent/ffprobe");
        let result = probe.duration(Path::new("/tmp/clip.mp4")).await;
        assert_matches!(result, Err(ProbeError::Spawn(_)));
    }
}
