// components/media_tool/src/error.rs
use std::fmt;
use std::path::PathBuf;

use media_downloader::{FetchError, LoadError, ScreenshotError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification reported to the caller with every failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input, rejected before any I/O
    Validation,
    /// Source unreachable, unsupported or missing on disk
    Resolution,
    Fetch,
    Screenshot,
    /// Anything else, logged with full detail
    Unexpected,
}

impl ErrorKind {
    pub fn is_expected(self) -> bool {
        self != ErrorKind::Unexpected
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Resolution => "resolution",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Screenshot => "screenshot",
            ErrorKind::Unexpected => "unexpected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Resolution(#[from] LoadError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Screenshot(#[from] ScreenshotError),

    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Panicked(String),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::Validation(_) => ErrorKind::Validation,
            ToolError::Resolution(_) => ErrorKind::Resolution,
            ToolError::Fetch(_) => ErrorKind::Fetch,
            ToolError::Screenshot(_) => ErrorKind::Screenshot,
            ToolError::OutputDir { .. } | ToolError::Panicked(_) => ErrorKind::Unexpected,
        }
    }
}
