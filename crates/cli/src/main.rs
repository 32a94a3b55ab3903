//! Bazaar CLI - Database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bazaar-cli migrate
//!
//! # Load products, warehouses and stock levels from YAML
//! bazaar-cli seed catalog -f crates/cli/seed/catalog.yaml
//!
//! # Check a catalog file without touching the database
//! bazaar-cli seed catalog -f crates/cli/seed/catalog.yaml --dry-run
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar-cli")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database from files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load products, warehouses and stock levels from a YAML catalog
    Catalog {
        /// Path to the catalog YAML file
        #[arg(short, long)]
        file: PathBuf,

        /// Validate the file and exit without connecting to the database
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file, dry_run } => {
                commands::seed::catalog(&file, dry_run).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_catalog() {
        let cli = Cli::try_parse_from(["bazaar-cli", "seed", "catalog", "-f", "catalog.yaml"])
            .expect("valid arguments");
        let Commands::Seed {
            target: SeedTarget::Catalog { file, dry_run },
        } = cli.command
        else {
            panic!("expected seed catalog");
        };
        assert_eq!(file, PathBuf::from("catalog.yaml"));
        assert!(!dry_run);
    }

    #[test]
    fn test_seed_catalog_requires_file() {
        assert!(Cli::try_parse_from(["bazaar-cli", "seed", "catalog"]).is_err());
    }
}
