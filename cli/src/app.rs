use anyhow::{anyhow, Context, Result};
use colored::*;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::time::Duration;

use frontdesk_core::client::ApiClient;
use frontdesk_core::errors::ApiError;
use frontdesk_core::types::RegisterRequest;

use crate::format::format_date;
use crate::refresh::{load_dashboard, run_watch, WatchOutcome};
use crate::render::{render_dashboard, RenderOptions};

/// Route the browser UI redirects to when a session dies
pub const LOGIN_ROUTE: &str = "/login/";

/// Route the browser UI returns to after sign-out
pub const HOME_ROUTE: &str = "/";

/// Loads the dashboard once and renders it
pub async fn run_dashboard(
    client: &ApiClient,
    options: &RenderOptions,
    date: Option<String>,
) -> Result<()> {
    if let Some(date) = date {
        // The date filter is display-only wiring; it never shapes the data
        info!("Date filter set to {}", date);
    }

    let spinner = spinner("Loading dashboard...");
    let view = load_dashboard(client).await;
    spinner.finish_and_clear();

    print!("{}", render_dashboard(&view, options));

    if view.session_expired {
        report_session_expired();
        return Err(anyhow!("session expired"));
    }

    Ok(())
}

/// Re-renders the dashboard on the configured interval until interrupted
pub async fn run_dashboard_watch(
    client: &ApiClient,
    options: &RenderOptions,
    refresh_secs: u64,
    date: Option<String>,
) -> Result<()> {
    if let Some(date) = date {
        info!("Date filter set to {}", date);
    }

    info!("Watching the dashboard every {}s", refresh_secs);
    match run_watch(client.clone(), options.clone(), refresh_secs).await {
        WatchOutcome::Interrupted => Ok(()),
        WatchOutcome::SessionExpired => {
            report_session_expired();
            Err(anyhow!("session expired"))
        }
    }
}

/// Signs in and stores the session token
pub async fn run_login(client: &ApiClient, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .context("Failed to read the email")?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read the password")?;

    let spinner = spinner("Signing in...");
    match client.login(&email, &password).await {
        Ok(_) => {
            spinner.finish_and_clear();
            println!("{}", format!("Signed in as {}.", email).green());
            Ok(())
        }
        Err(ApiError::Rejected { message }) => {
            spinner.finish_and_clear();
            eprintln!("{}", format!("Login failed: {}", message).red());
            Err(anyhow!("login rejected"))
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e).context("Failed to sign in")
        }
    }
}

/// Creates a new account; the server validates the repeated password
pub async fn run_register(client: &ApiClient) -> Result<()> {
    let email: String = Input::new()
        .with_prompt("Email")
        .interact_text()
        .context("Failed to read the email")?;
    let first_name: String = Input::new()
        .with_prompt("First name")
        .interact_text()
        .context("Failed to read the first name")?;
    let last_name: String = Input::new()
        .with_prompt("Last name")
        .interact_text()
        .context("Failed to read the last name")?;
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read the password")?;
    let password2 = Password::new()
        .with_prompt("Repeat password")
        .interact()
        .context("Failed to read the repeated password")?;

    let request = RegisterRequest {
        email: email.clone(),
        first_name,
        last_name,
        password,
        password2,
    };

    let spinner = spinner("Registering...");
    match client.register(&request).await {
        Ok(_) => {
            spinner.finish_and_clear();
            if client.session().is_authenticated() {
                println!(
                    "{}",
                    format!("Account created for {}; you are signed in.", email).green()
                );
            } else {
                println!(
                    "{}",
                    format!(
                        "Account created for {}. Sign in with `frontdesk login`.",
                        email
                    )
                    .green()
                );
            }
            Ok(())
        }
        Err(ApiError::Rejected { message }) => {
            spinner.finish_and_clear();
            eprintln!("{}", format!("Registration failed: {}", message).red());
            Err(anyhow!("registration rejected"))
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e).context("Failed to register")
        }
    }
}

/// Drops the stored session token
pub fn run_logout(client: &ApiClient) -> Result<()> {
    client.logout().context("Failed to clear the session")?;
    info!("Signed out; returning to {}", HOME_ROUTE);
    println!("{}", "Signed out.".green());
    Ok(())
}

/// Shows the signed-in user's profile
pub async fn run_whoami(client: &ApiClient) -> Result<()> {
    let spinner = spinner("Fetching profile...");
    match client.current_user().await {
        Ok(profile) => {
            spinner.finish_and_clear();
            let name = crate::format::full_name(
                profile.first_name.as_deref(),
                profile.last_name.as_deref(),
            );
            println!("{} {}", "Name:".bold(), name);
            println!(
                "{} {}",
                "Email:".bold(),
                profile.email.as_deref().unwrap_or("N/A")
            );
            println!(
                "{} {}",
                "Role:".bold(),
                profile.role.as_deref().unwrap_or("N/A")
            );
            println!(
                "{} {}",
                "Joined:".bold(),
                format_date(profile.date_joined.as_deref())
            );
            Ok(())
        }
        Err(ApiError::Unauthorized) => {
            spinner.finish_and_clear();
            report_session_expired();
            Err(anyhow!("session expired"))
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e).context("Failed to fetch the profile")
        }
    }
}

/// Changes the signed-in user's password
pub async fn run_change_password(client: &ApiClient) -> Result<()> {
    let old_password = Password::new()
        .with_prompt("Current password")
        .interact()
        .context("Failed to read the current password")?;
    let new_password = Password::new()
        .with_prompt("New password")
        .interact()
        .context("Failed to read the new password")?;

    let spinner = spinner("Changing password...");
    match client.change_password(&old_password, &new_password).await {
        Ok(_) => {
            spinner.finish_and_clear();
            println!("{}", "Password changed.".green());
            Ok(())
        }
        Err(ApiError::Unauthorized) => {
            spinner.finish_and_clear();
            report_session_expired();
            Err(anyhow!("session expired"))
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e).context("Failed to change the password")
        }
    }
}

fn report_session_expired() {
    warn!("Session invalidated; directing to {}", LOGIN_ROUTE);
    eprintln!(
        "{}",
        "Session expired. Sign in again with `frontdesk login`.".red()
    );
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
