//! Pantry CLI - Database migrations and demo data.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! pantry-cli migrate
//!
//! # Create the demo account with a stocked kitchen
//! pantry-cli seed --email demo@pantry.local --password pantry-demo
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Create a demo account for local development

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pantry-cli")]
#[command(author, version, about = "Pantry CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create a demo account with ingredients, utensils and preferences
    Seed {
        /// Demo account email address
        #[arg(short, long, default_value = "demo@pantry.local")]
        email: String,

        /// Demo account password
        #[arg(short, long, default_value = "pantry-demo")]
        password: String,

        /// Demo account display name
        #[arg(short, long, default_value = "Demo Cook")]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            email,
            password,
            name,
        } => commands::seed::demo(&email, &password, &name).await?,
    }
    Ok(())
}
