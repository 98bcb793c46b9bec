// Core client functionality for the booking API:
// - Authenticated HTTP client
// - Session and token storage
// - Domain record structures
// - Configuration loading
// - Shared error types

// Export client module - authenticated API client
pub mod client;
pub use client::*;

// Export session module - token lifecycle and stores
pub mod session;
pub use session::*;

// Export types module - domain records and list envelopes
pub mod types;
pub use types::*;

// Export config module - configuration loading
pub mod config;
pub use config::*;

// Export errors module - shared error types
pub mod errors;
pub use errors::*;
