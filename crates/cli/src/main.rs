//! Farmstall CLI - terminal front end for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and look around
//! farmstall auth login -e me@example.com -p <password>
//! farmstall products list
//! farmstall products show <product-id>
//!
//! # Place an order
//! farmstall orders place <product-id> -q 1.5 -m "+27 82 000 0000" -a "1 Farm Rd"
//!
//! # Vendor lifecycle
//! farmstall vendor apply -s "Green Acres" -c "+27 82 000 0000"
//! farmstall vendor pending
//! farmstall vendor approve <application-id>
//! ```
//!
//! # Environment Variables
//!
//! - `FARMSTALL_API_URL` - Base URL of the Remote Store API (required)
//! - `FARMSTALL_TOKEN_PATH` - Token slot location (optional)
//! - `RUST_LOG` - Log filter (default: `info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "farmstall")]
#[command(author, version, about = "Farmstall storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, sign in, and inspect the current session
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: commands::products::ProductAction,
    },
    /// Place and list orders
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrderAction,
    },
    /// Vendor application lifecycle
    Vendor {
        #[command(subcommand)]
        action: commands::vendors::VendorAction,
    },
    /// Show the router decision for a path under the current session
    Route {
        /// Request path, e.g. `/admin` or `/products/p1`
        path: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Auth { action } => commands::auth::run(&ctx, action).await?,
        Commands::Products { action } => commands::products::run(&ctx, action).await?,
        Commands::Orders { action } => commands::orders::run(&ctx, action).await?,
        Commands::Vendor { action } => commands::vendors::run(&ctx, action).await?,
        Commands::Route { path } => commands::route(&ctx, &path).await,
    }
    Ok(())
}
