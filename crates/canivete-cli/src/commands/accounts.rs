//! Accounts command - manage accountant and client identities.

use clap::{Args, Subcommand};
use console::style;

use canivete_core::directory::{AccessDirectory, FileAccessDirectory, Identity, Role};

use super::load_config;

/// Arguments for the accounts command.
#[derive(Args)]
pub struct AccountsArgs {
    #[command(subcommand)]
    command: AccountsCommand,
}

#[derive(Subcommand)]
enum AccountsCommand {
    /// Bootstrap the first accountant account
    Init {
        /// Accountant or office display name
        #[arg(long)]
        name: String,

        /// Login username
        #[arg(long)]
        login: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Create a client account
    Create {
        /// Company or person display name
        #[arg(long)]
        name: String,

        /// Login username
        #[arg(long)]
        login: String,

        /// Temporary password
        #[arg(long)]
        password: String,
    },

    /// Delete a client account
    Delete {
        /// Login username
        #[arg(long)]
        login: String,
    },

    /// List client accounts
    List,
}

pub fn run(args: AccountsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let directory = FileAccessDirectory::new(&config.directory.users_file);

    match args.command {
        AccountsCommand::Init {
            name,
            login,
            password,
        } => {
            if directory.has_accountant()? {
                anyhow::bail!("an accountant account already exists");
            }
            directory.create(
                &Identity {
                    username: login.clone(),
                    display_name: name,
                    role: Role::Accountant,
                },
                &password,
            )?;
            println!(
                "{} Accountant account '{}' created",
                style("✓").green(),
                login
            );
        }

        AccountsCommand::Create {
            name,
            login,
            password,
        } => {
            if !directory.has_accountant()? {
                anyhow::bail!("no accountant account yet; run 'canivete accounts init' first");
            }
            directory.create(
                &Identity {
                    username: login.clone(),
                    display_name: name.clone(),
                    role: Role::Client,
                },
                &password,
            )?;
            println!("{} Client '{}' created", style("✓").green(), name);
            println!("  login: {login}");
        }

        AccountsCommand::Delete { login } => {
            match directory.lookup(&login)? {
                Some(identity) if identity.role == Role::Client => {}
                Some(_) => anyhow::bail!("'{login}' is not a client account"),
                None => anyhow::bail!("no identity named '{login}'"),
            }
            directory.delete(&login)?;
            println!("{} Client '{}' deleted", style("✓").green(), login);
        }

        AccountsCommand::List => {
            let clients = directory.list_clients()?;
            if clients.is_empty() {
                println!("{} No clients registered yet.", style("ℹ").blue());
                return Ok(());
            }
            for client in clients {
                println!("{:<20} {}", client.username, client.display_name);
            }
        }
    }

    Ok(())
}
