//! Ecommerce CLI - Database migrations and seed data.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! ecommerce-cli migrate
//!
//! # Insert sample users and products
//! ecommerce-cli seed --users 10 --products 25
//! ```
//!
//! Both commands read the same database settings as the API server
//! (`DATABASE_URL`, or `DB_USER` / `DB_PASSWORD` / `DB_HOST` / `DB_PORT` /
//! `DB_NAME`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ecommerce-cli")]
#[command(author, version, about = "Ecommerce API CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert sample users and products
    Seed {
        /// Number of users to create
        #[arg(long, default_value_t = 5)]
        users: u32,

        /// Number of products to create
        #[arg(long, default_value_t = 10)]
        products: u32,
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

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { users, products } => {
            commands::seed::run(users, products).await?;
        }
    }
    Ok(())
}
