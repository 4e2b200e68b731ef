// components/media_tool/src/lib.rs
//! The `youtube-dl` tool: validate a call, resolve the source, fetch it if
//! remote, optionally grab a frame, and report a structured result.

mod config;
mod error;
mod request;
mod result;
mod tool;

pub use config::{default_output_dir, ToolConfig};
pub use error::{ErrorKind, ToolError};
pub use media_downloader::{MediaDescriptor, SourceKind};
pub use request::InvocationRequest;
pub use result::{InvocationResult, ToolFailure, ToolOutput};
pub use tool::{YoutubeDlTool, TOOL_NAME};
