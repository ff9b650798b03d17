//! Tienda CLI - Cart and catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the saved cart
//! tienda cart show
//!
//! # Empty the saved cart
//! tienda cart clear
//!
//! # List the remote catalog, optionally by category
//! tienda catalog list --category accesorios
//! ```
//!
//! # Commands
//!
//! - `cart show` - Print the persisted cart
//! - `cart clear` - Empty the persisted cart
//! - `catalog list` - Fetch and print the product catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tienda_core::CategoryFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tienda")]
#[command(author, version, about = "Tienda CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or reset the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Query the remote product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the saved cart
    Show,
    /// Empty the saved cart
    Clear,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Category filter (`all`, `ropa`, `accesorios`, `ofertas`)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show()?,
            CartAction::Clear => commands::cart::clear()?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List { category } => commands::catalog::list(category).await?,
        },
    }
    Ok(())
}
