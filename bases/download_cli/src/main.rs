// bases/download_cli/src/main.rs
mod args;
mod output;
mod app;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
use args::Args;
use app::App;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Logs go to stderr so --json output stays parseable
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(args);

    match app.run().await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(error) => {
            app.print_error(&error);
            std::process::exit(1);
        }
    }
}
