//! Reports command - browse and download per-client report history.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use canivete_core::directory::{AccessDirectory, FileAccessDirectory, Role};
use canivete_core::store::{FsReportStore, ReportStore, LISTING_CAP};

use super::load_config;

/// Arguments for the reports command.
#[derive(Args)]
pub struct ReportsArgs {
    /// Accountant username performing the action
    #[arg(short, long)]
    user: String,

    #[command(subcommand)]
    command: ReportsCommand,
}

#[derive(Subcommand)]
enum ReportsCommand {
    /// List clients that have sent reports
    Clients,

    /// List a client's reports, newest first
    List {
        /// Client username
        #[arg(long)]
        client: String,
    },

    /// Download one of a client's reports
    Download {
        /// Client username
        #[arg(long)]
        client: String,

        /// Report filename as shown by `reports list`
        #[arg(long)]
        name: String,

        /// Destination path (default: the report filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn run(args: ReportsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    // Report history is readable by accountants only
    let directory = FileAccessDirectory::new(&config.directory.users_file);
    match directory.lookup(&args.user)? {
        Some(identity) if identity.role == Role::Accountant => {}
        Some(_) => anyhow::bail!("'{}' is not an accountant account", args.user),
        None => anyhow::bail!("unknown user '{}'", args.user),
    }

    let store = FsReportStore::new(&config.storage.root);

    match args.command {
        ReportsCommand::Clients => {
            let owners = store.list_owners()?;
            if owners.is_empty() {
                println!("{} No client has sent reports yet.", style("ℹ").blue());
                return Ok(());
            }
            for owner in owners {
                println!("{owner}");
            }
        }

        ReportsCommand::List { client } => {
            let names = store.list_artifacts(&client)?;
            if names.is_empty() {
                println!(
                    "{} Client '{}' has not sent any reports yet.",
                    style("ℹ").blue(),
                    client
                );
                return Ok(());
            }
            for name in names.iter().take(LISTING_CAP) {
                println!("{name}");
            }
        }

        ReportsCommand::Download {
            client,
            name,
            output,
        } => {
            let bytes = store.read(&client, &name)?;
            let destination = output.unwrap_or_else(|| PathBuf::from(&name));
            fs::write(&destination, bytes)?;
            println!(
                "{} Downloaded {} to {}",
                style("✓").green(),
                name,
                destination.display()
            );
        }
    }

    Ok(())
}
