// components/media_downloader/src/utils.rs
use std::path::{Path, PathBuf};

use crate::error::DownloadError;
use crate::types::MediaFormat;

/// Number of stderr lines kept when a subprocess fails
const STDERR_TAIL_LINES: usize = 5;

/// Replace a leading `~` with the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Make a path absolute against the current directory without touching symlinks
pub fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Last few non-empty lines of a subprocess' stderr
pub fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// The yt-dlp output template for a requested filename: `<dir>/<stem>.%(ext)s`
pub fn output_template(dir: &Path, filename: &str) -> PathBuf {
    dir.join(format!("{}.%(ext)s", file_stem(filename)))
}

pub fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

/// Find what yt-dlp wrote and make sure it ends up at `expected`.
///
/// The exact path wins. Otherwise `<dir>/<stem><ext>` is tried for each
/// fallback extension of `format` and the first hit is renamed into place.
pub async fn locate_download(
    expected: &Path,
    format: MediaFormat,
) -> Result<PathBuf, DownloadError> {
    if tokio::fs::try_exists(expected).await? {
        return Ok(expected.to_path_buf());
    }

    let dir = expected.parent().unwrap_or_else(|| Path::new("."));
    let stem = expected
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    for ext in format.fallback_extensions() {
        let candidate = dir.join(format!("{stem}{ext}"));
        if candidate == expected {
            continue;
        }
        if tokio::fs::try_exists(&candidate).await? {
            tracing::debug!(
                "Renaming {} to {}",
                candidate.display(),
                expected.display()
            );
            tokio::fs::rename(&candidate, expected).await?;
            return Ok(expected.to_path_buf());
        }
    }

    Err(DownloadError::OutputMissing(format))
}
