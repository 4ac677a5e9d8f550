//! Channel id computation command.

use querypay_crypto::Address;
use querypay_types::{calculate_channel_id, ChannelConstants};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{ChannelIdOutput, OutputFormat, Render};

/// Execute the channel-id command.
///
/// Chain id and challenge duration fall back to the `[channel]` section.
pub fn channel_id(
    config: &CliConfig,
    participants: Vec<Address>,
    nonce: u64,
    chain_id: Option<u64>,
    challenge_duration: Option<u64>,
    format: OutputFormat,
) -> CliResult<String> {
    if participants.is_empty() {
        return Err(CliError::user("at least one participant is required"));
    }

    let constants = ChannelConstants::new(
        chain_id.unwrap_or(config.channel.chain_id),
        participants,
        nonce,
        challenge_duration.unwrap_or(config.channel.challenge_duration),
    );
    let id = calculate_channel_id(&constants);
    tracing::debug!(channel_id = %id, "Computed channel id");

    let output = ChannelIdOutput {
        channel_id: id.to_string(),
        chain_id: constants.chain_id,
        participants: constants
            .participants
            .iter()
            .map(ToString::to_string)
            .collect(),
        nonce: constants.channel_nonce,
        challenge_duration: constants.challenge_duration,
    };

    Ok(output.render(format))
}
