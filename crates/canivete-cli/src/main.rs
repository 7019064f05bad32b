//! CLI for NF-e invoice reporting between clients and accountants.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{accounts, process, reports};

/// Canivete Fiscal - process NF-e uploads into spreadsheet reports
#[derive(Parser)]
#[command(name = "canivete")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a batch of NF-e XML files into a stored report
    Process(process::ProcessArgs),

    /// Browse and download per-client report history
    Reports(reports::ReportsArgs),

    /// Manage accountant and client accounts
    Accounts(accounts::AccountsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()),
        Commands::Reports(args) => reports::run(args, cli.config.as_deref()),
        Commands::Accounts(args) => accounts::run(args, cli.config.as_deref()),
    }
}
