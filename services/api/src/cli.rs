use crate::demo::{run_demo, run_positions_list, DemoArgs, ListArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hiring_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hiring AI",
    about = "Draft, review, and browse job positions from the command line",
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
    /// Browse the sample positions list
    Positions {
        #[command(subcommand)]
        command: PositionsCommand,
    },
    /// Walk the position wizard end to end against the mock generator
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum PositionsCommand {
    /// Search, filter, and sort positions
    List(ListArgs),
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
        Command::Positions {
            command: PositionsCommand::List(args),
        } => run_positions_list(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
