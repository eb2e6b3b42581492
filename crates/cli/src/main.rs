//! EcoShop CLI - browse the catalog and manage a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in with the demo account
//! ecoshop login -e demo@example.com -p password
//!
//! # Browse and filter products
//! ecoshop products list --category "Smart Home" --sort price-low
//! ecoshop products show 3
//!
//! # Manage the cart
//! ecoshop cart add 2 --quantity 2
//! ecoshop cart show
//! ```
//!
//! # Commands
//!
//! - `products list|show` - Catalog listing and product detail
//! - `cart show|add|remove|set|clear` - Shopping cart
//! - `favorites show|add|remove|toggle` - Favorited products
//! - `login`, `logout`, `register`, `whoami` - Session
//! - `profile update` - Edit the signed-in user's profile
//!
//! State persists between invocations under `ECOSHOP_DATA_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecoshop_core::{CategoryFilter, Price, ProductId};
use ecoshop_storefront::catalog::SortKey;
use ecoshop_storefront::config::StorefrontConfig;
use ecoshop_storefront::error::{AppError, Result};
use ecoshop_storefront::routes::Route;
use ecoshop_storefront::state::Storefront;

mod commands;

#[derive(Parser)]
#[command(name = "ecoshop")]
#[command(author, version, about = "EcoShop storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorited products
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Sign in
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Page to continue to after signing in (e.g. `/cart`)
        #[arg(long)]
        next: Option<Route>,
    },
    /// Sign out
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Repeat the password
        #[arg(long)]
        confirm_password: String,
    },
    /// Show the signed-in user
    Whoami,
    /// Manage the signed-in user's profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Category name, or `All`
        #[arg(short, long, default_value = "All")]
        category: CategoryFilter,

        /// Text search over name, description, and tags; overrides the category
        #[arg(short, long)]
        search: Option<String>,

        /// Lowest price to include
        #[arg(long, value_parser = Price::parse)]
        min_price: Option<Price>,

        /// Highest price to include
        #[arg(long, value_parser = Price::parse)]
        max_price: Option<Price>,

        /// `featured`, `price-low`, `price-high`, `newest`, or `rating`
        #[arg(long, default_value = "featured")]
        sort: SortKey,
    },
    /// Show one product with related items
    Show { id: ProductId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and the order summary
    Show,
    /// Add a product
    Add {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { id: ProductId },
    /// Set a line's quantity; 0 removes it
    Set { id: ProductId, quantity: u32 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorited products
    Show,
    /// Favorite a product
    Add { id: ProductId },
    /// Unfavorite a product
    Remove { id: ProductId },
    /// Flip a product's favorite state
    Toggle { id: ProductId },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Change name or email; omitted fields keep their value
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
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

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ecoshop_storefront=info,ecoshop_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = config
        .map_err(AppError::from)
        .and_then(|config| run(cli, &config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            eprintln!("error: {}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &StorefrontConfig) -> Result<()> {
    let mut storefront = Storefront::new(config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                search,
                min_price,
                max_price,
                sort,
            } => commands::products::list(
                &storefront,
                &commands::products::ListArgs {
                    category,
                    search,
                    min_price,
                    max_price,
                    sort,
                },
            )?,
            ProductsAction::Show { id } => commands::products::show(&storefront, &id)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&storefront)?,
            CartAction::Add { id, quantity } => {
                commands::cart::add(&mut storefront, &id, quantity)?;
            }
            CartAction::Remove { id } => commands::cart::remove(&mut storefront, &id)?,
            CartAction::Set { id, quantity } => {
                commands::cart::set(&mut storefront, &id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(&mut storefront)?,
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::Show => commands::favorites::show(&storefront)?,
            FavoritesAction::Add { id } => commands::favorites::add(&mut storefront, &id)?,
            FavoritesAction::Remove { id } => {
                commands::favorites::remove(&mut storefront, &id)?;
            }
            FavoritesAction::Toggle { id } => {
                commands::favorites::toggle(&mut storefront, &id)?;
            }
        },
        Commands::Login {
            email,
            password,
            next,
        } => commands::account::login(&mut storefront, &email, &password.into(), next)?,
        Commands::Logout => commands::account::logout(&mut storefront),
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
        } => commands::account::register(
            &mut storefront,
            &ecoshop_storefront::auth::Registration {
                first_name,
                last_name,
                email,
                password: password.into(),
                confirm_password: confirm_password.into(),
            },
        )?,
        Commands::Whoami => commands::account::whoami(&storefront)?,
        Commands::Profile { action } => match action {
            ProfileAction::Update {
                first_name,
                last_name,
                email,
            } => commands::account::update_profile(
                &mut storefront,
                ecoshop_storefront::auth::ProfileUpdate {
                    first_name,
                    last_name,
                    email,
                },
            )?,
        },
    }
    Ok(())
}
