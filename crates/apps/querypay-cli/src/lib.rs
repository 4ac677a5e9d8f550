//! Command-line interface for the querypay channel protocol.
//!
//! This crate provides the `querypay` binary, a set of offline tools for
//! working with query channels:
//!
//! - **channel-id**: Compute a channel id from its constants
//! - **decode**: Inspect a framed wallet-protocol message
//! - **config**: Show (or create) the effective configuration
//!
//! # Quick Start
//!
//! ```bash
//! # Compute the id of a channel between two participants
//! querypay channel-id -p 0x01...01 -p 0x02...02 --nonce 7
//!
//! # Decode a captured message
//! querypay decode message.bin --format json
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from `~/.querypay/config.toml`. Override with
//! `--config` or `QUERYPAY_CONFIG`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

// Re-export main types
pub use cli::{Cli, Commands, OutputFormatArg};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Render};
