//! CLI command implementations.

pub mod channel_id;
pub mod config;
pub mod decode;

// Re-export command handlers
pub use channel_id::channel_id;
pub use config::show_config;
pub use decode::decode;
