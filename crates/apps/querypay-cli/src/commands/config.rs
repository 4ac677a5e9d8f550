//! Configuration display command.

use std::path::Path;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{ConfigOutput, OutputFormat, Render};

/// Execute the config command.
///
/// With `init`, writes the defaults to `path` when no file exists yet.
pub fn show_config(path: &Path, init: bool, format: OutputFormat) -> CliResult<String> {
    let exists = path.exists();
    let created = init && !exists;
    if created {
        CliConfig::default().save(path)?;
        tracing::info!(path = %path.display(), "Wrote default configuration");
    }

    let config = CliConfig::load(path)?;
    let ops = config.ops_config();

    let output = ConfigOutput {
        path: path.display().to_string(),
        exists,
        created,
        chain_id: config.channel.chain_id,
        challenge_duration: config.channel.challenge_duration,
        initial_cache_capacity: ops.initial_cache_capacity,
        zero_value_shortcut: ops.zero_value_shortcut,
        log_filter: config.logging.filter,
    };

    Ok(output.render(format))
}
