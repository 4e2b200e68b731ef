// bases/download_cli/src/app.rs
use color_eyre::Result;
use media_tool::YoutubeDlTool;
use crate::args::Args;
use crate::output::OutputHandler;

pub struct App {
    args: Args,
    output: OutputHandler,
}

impl App {
    pub fn new(args: Args) -> Self {
        let output = OutputHandler::new(args.verbose, args.json);
        Self { args, output }
    }

    /// Run one invocation, returning whether it succeeded
    pub async fn run(&self) -> Result<bool> {
        let tool = YoutubeDlTool::new(self.args.tool_config())?;

        self.output.print_start(&self.args.source);

        let result = tool.invoke(self.args.request()).await;

        self.output.print_result(&result)?;

        Ok(result.is_success())
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}
