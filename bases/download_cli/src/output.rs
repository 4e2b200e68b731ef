// bases/download_cli/src/output.rs
use color_eyre::Result;
use media_tool::{InvocationResult, MediaDescriptor, ToolFailure, ToolOutput};

pub struct OutputHandler {
    verbose: bool,
    json: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn print_start(&self, source: &str) {
        if !self.json {
            println!("Retrieving: {}", source);
        }
    }

    pub fn print_result(&self, result: &InvocationResult) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(result)?);
            return Ok(());
        }

        match result {
            InvocationResult::Success(output) => self.print_success(output),
            InvocationResult::Failure(failure) => self.print_failure(failure),
        }
        Ok(())
    }

    fn print_success(&self, output: &ToolOutput) {
        let metadata: &MediaDescriptor = &output.metadata;

        println!("Saved: {} to {}", metadata.title, output.file_path.display());
        if !metadata.uploader.is_empty() {
            println!("Uploader: {}", metadata.uploader);
        }
        println!("Duration: {:.1} seconds", metadata.duration);
        if let Some(screenshot) = &output.screenshot_path {
            println!("Screenshot: {}", screenshot.display());
        }

        if self.verbose {
            println!("Source: {}", metadata.source);
            println!("Id: {}", metadata.id);
            if !metadata.description.is_empty() {
                println!("Description:\n{}", metadata.description);
            }
        }
    }

    fn print_failure(&self, failure: &ToolFailure) {
        eprintln!("Error ({}): {}", failure.kind, failure.message);
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}
