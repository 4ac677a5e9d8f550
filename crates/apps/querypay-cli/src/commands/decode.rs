//! Message decoding command.

use querypay_crypto::hex_decode;
use querypay_econ::decode_app_data;
use querypay_types::SignedState;
use querypay_wire::decode_message;
use std::path::Path;

use crate::error::{CliError, CliResult};
use crate::output::{
    AllocationSummary, DecodeOutput, OutputFormat, QuerySummary, Render, StateSummary,
};

/// Execute the decode command.
pub fn decode(file: &Path, hex: bool, format: OutputFormat) -> CliResult<String> {
    if !file.exists() {
        return Err(CliError::FileNotFound(file.display().to_string()));
    }

    let bytes = if hex {
        let text = std::fs::read_to_string(file)?;
        hex_decode(text.trim())?
    } else {
        std::fs::read(file)?
    };
    let message = decode_message(&bytes)?;
    tracing::debug!(
        bytes = bytes.len(),
        states = message.state_count(),
        "Decoded message"
    );

    let output = DecodeOutput {
        sender: message.sender.to_string(),
        recipient: message.recipient.to_string(),
        wallet_version: message.data.wallet_version.clone(),
        states: message.data.signed_states.iter().map(summarize).collect(),
    };

    Ok(output.render(format))
}

fn summarize(state: &SignedState) -> StateSummary {
    // App data that is not a query round is shown without a query section
    let query = if state.app_data.is_empty() {
        None
    } else {
        decode_app_data(&state.app_data)
            .ok()
            .map(|data| QuerySummary {
                state_type: format!("{:?}", data.state_type),
                request_cid: data.request_cid,
                payment_amount: data.payment_amount,
                response_cid: data.response_cid,
            })
    };

    StateSummary {
        channel_id: state.channel_id().to_string(),
        turn_num: state.turn_num,
        is_final: state.is_final,
        allocations: state
            .outcome
            .iter()
            .map(|allocation| AllocationSummary {
                token: allocation.token.to_string(),
                items: allocation
                    .items
                    .iter()
                    .map(|item| (item.destination.to_string(), item.amount))
                    .collect(),
            })
            .collect(),
        signers: state
            .signatures
            .iter()
            .map(|s| s.signer.to_string())
            .collect(),
        query,
    }
}
