//! Customer Desk CLI - Browse and edit customers on the remote service.
//!
//! # Usage
//!
//! ```bash
//! # List the first page of customers
//! cdesk list
//!
//! # Search by first or last name and jump to page 2
//! cdesk list --search silva --page 2
//!
//! # Register a customer
//! cdesk create --first-name Ana --last-name Souza --state SP --city Campinas \
//!     --neighborhood Centro --street "Rua das Flores" --number 100 --phone 19:99999-0000
//!
//! # Edit fields of customer 7
//! cdesk update 7 --set email=ana@example.com --set city=Santos
//!
//! # Keep the list on screen, refreshing every few seconds
//! cdesk watch --search ana
//! ```
//!
//! # Commands
//!
//! - `list` - Fetch once and print one page
//! - `show` - Print one customer
//! - `create` / `update` / `delete` - Write through the form view-models
//! - `watch` - Live list until Ctrl+C

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use customer_desk_client::ClientConfig;
use customer_desk_core::{CustomerId, Phone};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::customers::CreateArgs;

#[derive(Parser)]
#[command(name = "cdesk")]
#[command(author, version, about = "Customer Desk CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the customer list once and print a page
    List {
        /// Case-insensitive match on first or last name
        #[arg(short, long)]
        search: Option<String>,

        /// Page to show (clamped to the available pages)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Print one customer
    Show {
        /// Customer ID
        id: CustomerId,
    },
    /// Register a new customer
    Create(CreateArgs),
    /// Edit an existing customer
    Update {
        /// Customer ID
        id: CustomerId,

        /// Field assignment, e.g. `--set city=Santos` (repeatable)
        #[arg(long = "set", value_parser = commands::customers::parse_assignment)]
        assignments: Vec<(String, String)>,

        /// Replace the phone list, as AREA:NUMBER (repeatable)
        #[arg(long = "phone")]
        phones: Vec<Phone>,
    },
    /// Delete a customer
    Delete {
        /// Customer ID
        id: CustomerId,
    },
    /// Keep the list on screen, re-rendering on every refresh
    Watch {
        /// Case-insensitive match on first or last name
        #[arg(short, long)]
        search: Option<String>,

        /// Page to show (clamped to the available pages)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
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
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "customer_desk_client=info,customer_desk_cli=info".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be initialized before the subscriber
    let config = ClientConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::List { search, page } => commands::customers::list(config, search, page).await?,
        Commands::Show { id } => commands::customers::show(config, id).await?,
        Commands::Create(args) => commands::customers::create(config, args).await?,
        Commands::Update {
            id,
            assignments,
            phones,
        } => commands::customers::update(config, id, assignments, phones).await?,
        Commands::Delete { id } => commands::customers::delete(config, id).await?,
        Commands::Watch { search, page } => commands::watch::run(config, search, page).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_update_assignments_and_phones() {
        let cli = Cli::try_parse_from([
            "cdesk", "update", "7", "--set", "city=Santos", "--set", "email=", "--phone",
            "13:3222-1111",
        ])
        .unwrap();

        let Commands::Update {
            id,
            assignments,
            phones,
        } = cli.command
        else {
            panic!("expected update command");
        };
        assert_eq!(id, CustomerId::new(7));
        assert_eq!(
            assignments,
            vec![
                ("city".to_string(), "Santos".to_string()),
                ("email".to_string(), String::new()),
            ]
        );
        assert_eq!(phones, vec![Phone::new("13", "3222-1111")]);
    }

    #[test]
    fn test_create_requires_a_phone() {
        let result = Cli::try_parse_from([
            "cdesk",
            "create",
            "--first-name",
            "Ana",
            "--last-name",
            "Souza",
            "--state",
            "SP",
            "--city",
            "Campinas",
            "--neighborhood",
            "Centro",
            "--street",
            "Rua A",
            "--number",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_malformed_phone() {
        let result = Cli::try_parse_from(["cdesk", "update", "7", "--phone", "1332221111"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_defaults_to_first_page() {
        let cli = Cli::try_parse_from(["cdesk", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                search: None,
                page: 1
            }
        ));
    }
}
