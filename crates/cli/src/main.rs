//! RocketShoes CLI - Shopping cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rs-cli cart show
//!
//! # Add one unit of product 42
//! rs-cli cart add 42
//!
//! # Set product 42 to 5 units
//! rs-cli cart set 42 5
//!
//! # Remove product 42
//! rs-cli cart remove 42
//! ```
//!
//! # Commands
//!
//! - `cart show` - Print the cart (`--json` for the persisted form)
//! - `cart add` / `cart remove` - Add one unit / remove a product
//! - `cart set` - Set a product's quantity
//! - `cart increment` / `cart decrement` - Change a quantity by one
//!
//! Configuration comes from the environment (see `rocketshoes_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "rocketshoes_storefront=info,rocketshoes_cli=info";

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart contents
    Show {
        /// Print the persisted JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product in the cart
    Set {
        /// Product ID
        product_id: ProductId,
        /// Desired quantity (zero or less is ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Increase the quantity of a product in the cart by one
    Increment {
        /// Product ID
        product_id: ProductId,
    },
    /// Decrease the quantity of a product in the cart by one
    Decrement {
        /// Product ID
        product_id: ProductId,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(&state, json)?,
            CartAction::Add { product_id } => commands::cart::add(&state, product_id).await?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&state, product_id).await?;
            }
            CartAction::Set { product_id, amount } => {
                commands::cart::set(&state, product_id, amount).await?;
            }
            CartAction::Increment { product_id } => {
                commands::cart::step(&state, product_id, 1).await?;
            }
            CartAction::Decrement { product_id } => {
                commands::cart::step(&state, product_id, -1).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.split(',').all(|d| d.ends_with("=info")));
    }

    #[test]
    fn test_cli_parses_negative_set_amount() {
        let cli = Cli::try_parse_from(["rs-cli", "cart", "set", "42", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Set { amount: -1, .. }
            }
        ));
    }
}
