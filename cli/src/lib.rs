// Terminal admin dashboard for the booking API:
// - Command-line surface and subcommand handlers
// - Dashboard refresh engine with supersession
// - View-model construction and terminal rendering

pub mod app;
pub mod cli;
pub mod format;
pub mod logging;
pub mod refresh;
pub mod render;
pub mod view;
