//! Food delivery CLI - database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! food-cli migrate
//!
//! # Load menu entries from a YAML file
//! food-cli seed foods menu.yaml
//! ```
//!
//! Both commands read `FOOD_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "food-cli")]
#[command(author, version, about = "Food delivery CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert menu entries from a YAML file
    Foods {
        /// Path to the YAML file
        file: String,

        /// Directory the listed images are copied into
        #[arg(long, env = "FOOD_UPLOAD_DIR", default_value = "uploads")]
        upload_dir: String,
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
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Foods { file, upload_dir } => {
                commands::seed::foods(&file, &upload_dir).await?;
            }
        },
    }
    Ok(())
}
