use clap::Parser;
use colored::*;
use dotenv::dotenv;
use frontdesk_core::client::ApiClient;
use frontdesk_core::config::{ClientConfig, DEFAULT_REFRESH_SECS};
use frontdesk_core::errors::ApiResult;
use frontdesk_core::session::{FileTokenStore, Session};
use log::LevelFilter;
use std::error::Error;
use std::sync::Arc;

use frontdesk_cli::app;
use frontdesk_cli::cli::{Args, Command};
use frontdesk_cli::logging::{log_error, log_info};
use frontdesk_cli::render::RenderOptions;

/// Main function - drives the booking API session and the admin dashboard
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables first so FRONTDESK_* overrides are visible
    dotenv().ok();

    // Load configuration from the default path plus environment overrides
    let config = match ClientConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("Error loading configuration: {}", e).red());
            ClientConfig::default()
        }
    };

    // Parse command-line arguments
    let args = Args::parse();

    // Get log level from config or use default; --verbose wins
    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        config
            .log_level
            .as_deref()
            .map(|level| match level.to_lowercase().as_str() {
                "trace" => LevelFilter::Trace,
                "debug" => LevelFilter::Debug,
                "info" => LevelFilter::Info,
                "warn" => LevelFilter::Warn,
                "error" => LevelFilter::Error,
                _ => LevelFilter::Info,
            })
            .unwrap_or(LevelFilter::Info)
    };

    // Initialize logger with configured log level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.to_string()),
    )
    .init();

    let plain = args.plain || config.plain_output.unwrap_or(false);
    if plain {
        colored::control::set_override(false);
    }

    // Apply the --base-url override on top of config and environment
    let config = match args.base_url.clone() {
        Some(base_url) => ClientConfig {
            base_url: Some(base_url),
            ..config
        },
        None => config,
    };

    // Restore any persisted session token
    let session = match build_session() {
        Ok(session) => session,
        Err(e) => {
            log_error(&format!("Failed to restore the session: {}", e));
            eprintln!("{}", format!("Error restoring session: {}", e).red());
            return Err(e.into());
        }
    };

    if session.is_authenticated() {
        log_info("Restored a stored session token");
    }

    // Initialize the API client
    let client = match ApiClient::new(&config, session) {
        Ok(client) => client,
        Err(e) => {
            log_error(&format!("Failed to initialize the API client: {}", e));
            eprintln!("{}", format!("Error initializing API client: {}", e).red());
            return Err(e.into());
        }
    };

    let options = RenderOptions { plain };
    let refresh_secs = config.refresh_secs.unwrap_or(DEFAULT_REFRESH_SECS);

    // Dispatch the selected command; the dashboard is the default
    let command = args.command.unwrap_or_default();
    let result = match command {
        Command::Login { email } => app::run_login(&client, email).await,
        Command::Register => app::run_register(&client).await,
        Command::Logout => app::run_logout(&client),
        Command::Whoami => app::run_whoami(&client).await,
        Command::ChangePassword => app::run_change_password(&client).await,
        Command::Dashboard {
            watch,
            interval,
            date,
        } => {
            let refresh_secs = interval.unwrap_or(refresh_secs);
            if watch {
                app::run_dashboard_watch(&client, &options, refresh_secs, date).await
            } else {
                app::run_dashboard(&client, &options, date).await
            }
        }
    };

    if let Err(e) = result {
        log_error(&format!("Command failed: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn build_session() -> ApiResult<Session> {
    let path = FileTokenStore::default_path()?;
    Session::new(Arc::new(FileTokenStore::new(path)))
}
