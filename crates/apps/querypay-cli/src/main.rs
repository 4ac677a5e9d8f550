//! Querypay CLI binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use querypay_cli::{
    cli::{Cli, Commands},
    commands,
    config::{default_config_path, CliConfig},
    error::{CliError, CliResult},
    output::OutputFormat,
};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let config = match CliConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    };
    init_logging(&config, cli.verbose);

    match run(cli, &config, &config_path) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Initialize logging from `RUST_LOG`, else the `[logging]` filter.
///
/// `--verbose` adds `querypay=debug` on top.
fn init_logging(config: &CliConfig, verbose: bool) {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    if verbose {
        if let Ok(directive) = "querypay=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Print a user-friendly error message with error code and recovery hint.
fn print_error(e: &CliError) {
    let code = e.error_code();

    // Error line with code
    eprintln!(
        "{} [{}]: {}",
        "Error".red().bold(),
        code.to_string().yellow(),
        e
    );

    // Suggestion if available
    if let Some(suggestion) = code.suggestion() {
        eprintln!("{}: {}", "Hint".cyan(), suggestion);
    }
}

fn run(cli: Cli, config: &CliConfig, config_path: &std::path::Path) -> CliResult<String> {
    let format: OutputFormat = cli.format.into();

    match cli.command {
        Commands::ChannelId {
            participants,
            nonce,
            chain_id,
            challenge_duration,
        } => commands::channel_id(
            config,
            participants,
            nonce,
            chain_id,
            challenge_duration,
            format,
        ),
        Commands::Decode { file, hex } => commands::decode(&file, hex, format),
        Commands::Config { init } => commands::show_config(config_path, init, format),
    }
}
