// components/media_tool/src/result.rs
use std::path::PathBuf;

use media_downloader::MediaDescriptor;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Outcome of one invocation, always returned rather than raised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationResult {
    Success(ToolOutput),
    Failure(ToolFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Downloaded file, or the local source itself
    pub file_path: PathBuf,

    pub metadata: MediaDescriptor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub message: String,
    pub kind: ErrorKind,
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success(_))
    }

    pub fn output(&self) -> Option<&ToolOutput> {
        match self {
            InvocationResult::Success(output) => Some(output),
            InvocationResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ToolFailure> {
        match self {
            InvocationResult::Success(_) => None,
            InvocationResult::Failure(failure) => Some(failure),
        }
    }
}
