use colored::*;
use std::env;

// Colored user-facing echoes
// Structured logging goes through the `log` facade and env_logger

pub fn log_info(message: &str) {
    if env::var("FRONTDESK_DEBUG").is_ok() {
        eprintln!("{} {}", "[INFO]".cyan(), message);
    }
}

pub fn log_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}
