use crate::report::{run_history_report, run_latest_report, HistoryArgs, LatestArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use radar_health::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Radar Health Index",
    about = "Serve and inspect the logistics network health index",
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
    /// Print the headline, component scores and top drivers for one day
    Latest(LatestArgs),
    /// Print the daily headline series ending at a date
    History(HistoryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load observations from an `indicator_id,date,value` CSV instead of seeding
    #[arg(long)]
    pub(crate) observations_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Latest(args) => run_latest_report(args),
        Command::History(args) => run_history_report(args),
    }
}
