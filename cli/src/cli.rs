use clap::{Parser, Subcommand};

/// Terminal admin dashboard for the hotel booking API
#[derive(Parser, Debug)]
#[command(name = "frontdesk", author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the booking API (overrides config and FRONTDESK_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value_t = false)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        /// Account email; prompted for when omitted
        #[arg(long)]
        email: Option<String>,
    },

    /// Create a new account
    Register,

    /// Drop the stored session token
    Logout,

    /// Show the signed-in user's profile
    Whoami,

    /// Change the signed-in user's password
    ChangePassword,

    /// Show the admin dashboard (the default command)
    Dashboard {
        /// Keep refreshing on an interval instead of loading once
        #[arg(short, long, default_value_t = false)]
        watch: bool,

        /// Refresh interval in seconds for watch mode
        #[arg(long)]
        interval: Option<u64>,

        /// Date filter input; accepted and logged, display only
        #[arg(long)]
        date: Option<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Dashboard {
            watch: false,
            interval: None,
            date: None,
        }
    }
}
