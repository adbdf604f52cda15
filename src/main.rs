use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use kumbara::cli::setup::{setup, setup_at_path};
use kumbara::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for kumbara::AppCommand {
    fn from(cmd: Commands) -> kumbara::AppCommand {
        match cmd {
            Commands::Summary => kumbara::AppCommand::Summary,
            Commands::Alloc => kumbara::AppCommand::Alloc,
            Commands::Insights => kumbara::AppCommand::Insights,
            Commands::Record => kumbara::AppCommand::Record,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display holdings with value and profit/loss
    Summary,
    /// Display category allocation
    Alloc,
    /// Display risk score, weekly trend and insights
    Insights,
    /// Record current portfolio value in the history
    Record,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => setup_at_path(path),
            None => setup(),
        },
        Some(cmd) => kumbara::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
