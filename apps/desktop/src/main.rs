use std::{io, process};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use controller::ComplaintController;
use shared::{domain::ComplaintId, error::ComplaintError};
use storage::Storage;
use tracing_subscriber::EnvFilter;

mod config;
mod prompt;
mod render;

const VALIDATION_EXIT_CODE: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "complaints",
    about = "Record, list, search and delete complaints",
    version
)]
struct Cli {
    /// SQLite URL or file path; overrides complaints.toml and the environment.
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print information about this program.
    About,
    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that need the complaint database.
#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Validate and store a new complaint.
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "Male")]
        gender: String,
        #[arg(long)]
        comment: String,
    },
    /// Show stored complaints, optionally narrowed by a search term.
    List {
        #[arg(long)]
        search: Option<String>,
        /// Print rows as a JSON array instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Delete a complaint by id after confirmation.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let mut settings = config::load_settings()?;
    if let Some(database_url) = cli.database_url {
        settings.database_url = config::normalize_database_url(&database_url);
    }
    init_logging(&settings.log_filter);
    tracing::debug!(database_url = %settings.database_url, "settings loaded");

    let command = match cli.command {
        Command::About => {
            println!("{}", render::ABOUT);
            return Ok(0);
        }
        Command::Store(command) => command,
    };

    let storage = Storage::new(&settings.database_url)
        .await
        .with_context(|| format!("failed to open database '{}'", settings.database_url))?;
    let controller = ComplaintController::new(storage.clone());
    let result = handle_command(&controller, command).await;
    storage.close().await;
    result
}

async fn handle_command(
    controller: &ComplaintController<Storage>,
    command: StoreCommand,
) -> Result<i32> {
    match command {
        StoreCommand::Submit {
            name,
            gender,
            comment,
        } => match controller.save(&name, &gender, &comment).await {
            Ok(id) => {
                println!("Complaint submitted successfully! (id {id})");
                Ok(0)
            }
            Err(ComplaintError::Validation(err)) => {
                eprintln!("Validation Error: {err}");
                Ok(VALIDATION_EXIT_CODE)
            }
            Err(err) => Err(err).context("failed to save complaint"),
        },
        StoreCommand::List { search, json } => {
            let search = search.as_deref();
            let rows = controller
                .get(search)
                .await
                .context("failed to list complaints")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                let total = controller
                    .store()
                    .count()
                    .await
                    .context("failed to count complaints")?;
                print!("{}", render::render_table(&rows));
                println!("{}", render::render_summary(rows.len(), total, search));
            }
            Ok(0)
        }
        StoreCommand::Delete { id, yes } => {
            if !yes {
                let stdin = io::stdin();
                let mut stdout = io::stdout();
                let confirmed =
                    prompt::confirm("Delete this complaint?", &mut stdin.lock(), &mut stdout)
                        .context("failed to read confirmation")?;
                if !confirmed {
                    println!("Delete cancelled.");
                    return Ok(0);
                }
            }
            controller
                .delete(ComplaintId(id))
                .await
                .context("failed to delete complaint")?;
            println!("Complaint {id} deleted.");
            Ok(0)
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_parses_without_a_store_command() {
        let cli = Cli::try_parse_from(["complaints", "about"]).expect("parse");
        assert!(matches!(cli.command, Command::About));
    }

    #[test]
    fn store_commands_parse_into_their_own_enum() {
        let cli = Cli::try_parse_from(["complaints", "list", "--search", "Ali"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Store(StoreCommand::List { search: Some(ref s), json: false }) if s == "Ali"
        ));

        let cli = Cli::try_parse_from([
            "complaints",
            "--database-url",
            "sqlite::memory:",
            "delete",
            "3",
            "--yes",
        ])
        .expect("parse");
        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        assert!(matches!(
            cli.command,
            Command::Store(StoreCommand::Delete { id: 3, yes: true })
        ));
    }
}
