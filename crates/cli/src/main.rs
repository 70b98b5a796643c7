//! Taxi dispatch CLI - database provisioning and order administration.
//!
//! # Usage
//!
//! ```bash
//! # Create the database and apply migrations
//! taxi-cli migrate
//!
//! # Insert demo clients, drivers, and orders
//! taxi-cli seed
//!
//! # Mark an in-progress order as done
//! taxi-cli order complete 42
//!
//! # Print an order
//! taxi-cli order show 42
//! ```
//!
//! The database is taken from `DISPATCH_DATABASE_URL` (or `DATABASE_URL`),
//! the same as the web binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use taxi_dispatch_core::OrderId;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "taxi-cli")]
#[command(author, version, about = "Taxi dispatch CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and run migrations
    Migrate,
    /// Insert demo records
    Seed,
    /// Administer orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Mark an in-progress order as done
    Complete {
        /// Order ID
        id: OrderId,
    },
    /// Print an order
    Show {
        /// Order ID
        id: OrderId,
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

async fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Order { action } => match action {
            OrderAction::Complete { id } => commands::order::complete(id).await?,
            OrderAction::Show { id } => commands::order::show(id).await?,
        },
    }
    Ok(())
}
