//! Output formatting for CLI.

use colored::Colorize;
use serde::Serialize;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for renderable output.
pub trait Render {
    /// Render as human-readable string.
    fn render_human(&self) -> String;

    /// Render as JSON string.
    fn render_json(&self) -> String;

    /// Render in the specified format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// Output for channel id computation.
#[derive(Debug, Serialize)]
pub struct ChannelIdOutput {
    pub channel_id: String,
    pub chain_id: u64,
    pub participants: Vec<String>,
    pub nonce: u64,
    pub challenge_duration: u64,
}

impl Render for ChannelIdOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![format!(
            "{} {}",
            "Channel ID:".green().bold(),
            self.channel_id
        )];
        lines.push(format!("  Chain ID:           {}", self.chain_id));
        lines.push(format!("  Nonce:              {}", self.nonce));
        lines.push(format!(
            "  Challenge duration: {}s",
            self.challenge_duration
        ));
        for (i, participant) in self.participants.iter().enumerate() {
            lines.push(format!("  Participant {}:      {}", i, participant));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// A decoded signed state.
#[derive(Debug, Serialize)]
pub struct StateSummary {
    pub channel_id: String,
    pub turn_num: u64,
    pub is_final: bool,
    pub allocations: Vec<AllocationSummary>,
    pub signers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QuerySummary>,
}

/// One allocation of a decoded state.
#[derive(Debug, Serialize)]
pub struct AllocationSummary {
    pub token: String,
    pub items: Vec<(String, u64)>,
}

/// Query app data carried by a decoded state.
#[derive(Debug, Serialize)]
pub struct QuerySummary {
    pub state_type: String,
    pub request_cid: String,
    pub payment_amount: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub response_cid: String,
}

/// Output for message decoding.
#[derive(Debug, Serialize)]
pub struct DecodeOutput {
    pub sender: String,
    pub recipient: String,
    pub wallet_version: String,
    pub states: Vec<StateSummary>,
}

impl Render for DecodeOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!("{}", "Message".green().bold()),
            format!("  From:           {}", self.sender),
            format!("  To:             {}", self.recipient),
            format!("  Wallet version: {}", self.wallet_version),
        ];

        if self.states.is_empty() {
            lines.push(format!("  {}", "No signed states".yellow()));
        }
        for state in &self.states {
            let final_marker = if state.is_final {
                " (final)".red().to_string()
            } else {
                String::new()
            };
            lines.push(format!(
                "\n{} {}{}",
                "State turn".cyan().bold(),
                state.turn_num,
                final_marker
            ));
            lines.push(format!("  Channel: {}", state.channel_id));
            for allocation in &state.allocations {
                lines.push(format!("  Token:   {}", allocation.token));
                for (destination, amount) in &allocation.items {
                    lines.push(format!("    {} -> {}", destination, amount));
                }
            }
            lines.push(format!("  Signers: {}", state.signers.len()));
            for signer in &state.signers {
                lines.push(format!("    {}", signer));
            }
            if let Some(query) = &state.query {
                lines.push(format!(
                    "  Query:   {} {} ({} paid)",
                    query.state_type, query.request_cid, query.payment_amount
                ));
                if !query.response_cid.is_empty() {
                    lines.push(format!("  Response: {}", query.response_cid));
                }
            }
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for the effective configuration.
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub path: String,
    pub exists: bool,
    pub created: bool,
    pub chain_id: u64,
    pub challenge_duration: u64,
    pub initial_cache_capacity: usize,
    pub zero_value_shortcut: bool,
    pub log_filter: String,
}

impl Render for ConfigOutput {
    fn render_human(&self) -> String {
        let source = if self.created {
            "(created with defaults)".green().to_string()
        } else if self.exists {
            String::new()
        } else {
            "(not found, using defaults)".yellow().to_string()
        };
        [
            format!("{} {} {}", "Config:".bold(), self.path, source),
            "[channel]".cyan().to_string(),
            format!("  chain_id               = {}", self.chain_id),
            format!("  challenge_duration     = {}", self.challenge_duration),
            format!("  initial_cache_capacity = {}", self.initial_cache_capacity),
            format!("  zero_value_shortcut    = {}", self.zero_value_shortcut),
            "[logging]".cyan().to_string(),
            format!("  filter                 = {:?}", self.log_filter),
        ]
        .join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
