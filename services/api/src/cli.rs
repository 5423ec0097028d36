use crate::demo::{run_demo, run_export, DemoArgs, ExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sourcing_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Sourcing Evaluation Orchestrator",
    about = "Run and demonstrate the vendor bid evaluation service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run an end-to-end CLI demo covering scoring and the approval workflow
    Demo(DemoArgs),
    /// Print the CSV scoring matrix for a demo sourcing event
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Export(args) => run_export(args),
    }
}
