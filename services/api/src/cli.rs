use crate::batch::{run_batch, run_triage, BatchArgs, TriageArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use claim_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Claim Intake",
    about = "Collect accident claims and triage them for the legal team",
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
    /// Score a single hypothetical intake from command line flags
    Triage(TriageArgs),
    /// Triage every row of an intake CSV export
    Batch(BatchArgs),
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
        Command::Triage(args) => run_triage(args),
        Command::Batch(args) => run_batch(args),
    }
}
