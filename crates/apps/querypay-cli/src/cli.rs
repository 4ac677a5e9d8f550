//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use querypay_crypto::Address;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Querypay channel protocol CLI.
#[derive(Parser, Debug)]
#[command(name = "querypay")]
#[command(author = "Querypay Contributors")]
#[command(version)]
#[command(about = "Command-line tools for the querypay channel protocol")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "QUERYPAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a channel id from its constants.
    ///
    /// Participants are given payer first, as `0x`-prefixed addresses.
    ChannelId {
        /// Participant address (repeat for each participant, payer first).
        #[arg(short, long = "participant", required = true)]
        participants: Vec<Address>,

        /// Channel nonce.
        #[arg(short, long)]
        nonce: u64,

        /// Chain id (defaults to the configured chain id).
        #[arg(long)]
        chain_id: Option<u64>,

        /// Challenge duration in seconds (defaults to the configured value).
        #[arg(long)]
        challenge_duration: Option<u64>,
    },

    /// Decode a framed wallet-protocol message.
    ///
    /// Prints the envelope, every signed state and any query app data.
    Decode {
        /// File holding the framed message.
        file: PathBuf,

        /// The file holds hex text instead of raw bytes.
        #[arg(long)]
        hex: bool,
    },

    /// Show the effective configuration.
    Config {
        /// Write the defaults to the configuration path if no file exists.
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_channel_id() {
        let cli = Cli::parse_from([
            "querypay",
            "channel-id",
            "-p",
            "0x0101010101010101010101010101010101010101",
            "-p",
            "0x0202020202020202020202020202020202020202",
            "--nonce",
            "7",
        ]);

        match cli.command {
            Commands::ChannelId {
                participants,
                nonce,
                chain_id,
                ..
            } => {
                assert_eq!(participants.len(), 2);
                assert_eq!(participants[0], Address([1u8; 20]));
                assert_eq!(nonce, 7);
                assert_eq!(chain_id, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_reject_bad_address() {
        let result =
            Cli::try_parse_from(["querypay", "channel-id", "-p", "0x12", "--nonce", "1"]);
        assert!(result.is_err());
    }
}
