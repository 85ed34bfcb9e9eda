//! Wastetrace CLI - command-line client for the waste-tracking platform.
//!
//! Wraps the core library's session store and API client: login/logout,
//! account onboarding with KYC, transaction entry, reporting, and the
//! monitored product catalog. Falls back to cached data, labelled with its
//! age, when the backend is unreachable.

mod commands;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wastetrace_core::api::{ApiClient, ApiError};
use wastetrace_core::auth::SessionStore;
use wastetrace_core::cache::CacheManager;
use wastetrace_core::config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn usage() {
    eprintln!(
        "wastetrace - waste-tracking client

Usage: wastetrace <command> [args]

Commands:
  login [email] [--remember]      Log in (remember the password in the keychain)
  logout                          Log out and clear the local session
  register                        Create an account (interactive)
  whoami                          Show the locally stored session
  stats                           Per-user statistics (plus system stats for admins)
  accounts list                   List participant accounts
  accounts create                 Create an account (interactive)
  accounts block|suspend|unsuspend|delete <id>
  accounts kyc <id> <pending|approved|rejected>
  entries list                    List recorded transactions
  entries add                     Record a transaction (interactive)
  entries delete <id>
  reports stats|insights          Aggregate reporting
  reports export [--out <file>]   Download the exported report (PDF)
  products                        List the monitored product catalog

Environment:
  WASTETRACE_API_URL              Backend base URL (default http://localhost:8080/api)
  RUST_LOG                        Log filter (default warn)"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        usage();
        return Ok(());
    }

    let mut config = Config::load()?;
    let store = Arc::new(SessionStore::open_default()?);
    let client = ApiClient::new(config.api_base_url(), Arc::clone(&store))?;
    let cache = CacheManager::open_default()?;

    info!(command = %args[0], "Wastetrace CLI starting");

    let result = match args[0].as_str() {
        "login" => commands::login(&client, &mut config, &args[1..]).await,
        "logout" => commands::logout(&client),
        "register" => commands::register(&client).await,
        "whoami" => commands::whoami(&client),
        "stats" => commands::stats(&client, &cache).await,
        "accounts" => commands::accounts(&client, &cache, &args[1..]).await,
        "entries" => commands::entries(&client, &cache, &args[1..]).await,
        "reports" => commands::reports(&client, &args[1..]).await,
        "products" => commands::products(&client, &cache).await,
        "help" | "--help" | "-h" => {
            usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            usage();
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        match e.downcast_ref::<ApiError>() {
            // The client has already cleared the session for this one
            Some(ApiError::AuthRejected) => {
                eprintln!("Error: {}", ApiError::AuthRejected);
                eprintln!("Run 'wastetrace login' to start a new session.");
            }
            Some(api_err) => eprintln!("Error: {}", api_err),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}
