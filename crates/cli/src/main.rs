//! ChefEmCasa CLI - Data file management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the data file with the starter catalog (no-op if it exists)
//! chef-cli seed
//!
//! # Copy the data file to chefemcasa-backup-YYYY-MM-DD.json
//! chef-cli export --out-dir backups/
//!
//! # Restore a backup over the data file
//! chef-cli import backups/chefemcasa-backup-2026-10-15.json
//!
//! # List recipes, optionally filtered ("popular" or a category)
//! chef-cli recipes --filter popular
//! ```
//!
//! Every command works on `--data-file`, falling back to `CHEF_DATA_FILE`
//! and then `database.json`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "chef-cli")]
#[command(author, version, about = "ChefEmCasa CLI tools")]
struct Cli {
    /// Path of the JSON data file
    #[arg(short, long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data file with the starter catalog
    Seed {
        /// Replace an existing data file
        #[arg(long)]
        force: bool,
    },
    /// Write a dated backup of the data file
    Export {
        /// Directory to write the backup into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Replace the data file with a backup
    Import {
        /// Backup file to restore
        file: PathBuf,
    },
    /// List recipes through the home filter
    Recipes {
        /// `popular`, a category name, or nothing for all
        #[arg(short, long)]
        filter: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_file = cli.data_file.unwrap_or_else(commands::default_data_file);
    match cli.command {
        Commands::Seed { force } => commands::data::seed(&data_file, force).await?,
        Commands::Export { out_dir } => {
            commands::data::export(&data_file, &out_dir).await?;
        }
        Commands::Import { file } => commands::data::import(&data_file, &file).await?,
        Commands::Recipes { filter } => {
            commands::recipes::list(&data_file, filter.as_deref()).await?;
        }
    }
    Ok(())
}
