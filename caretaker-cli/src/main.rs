//! caretaker -- quality reports for unpacked H5P packages

use clap::Parser;
use colored::Colorize;

use caretaker_cli::cli::{Cli, Commands};
use caretaker_cli::commands;
use caretaker_cli::error::CliError;
use caretaker_cli::logging;
use caretaker_cli::output::OutputWriter;
use caretaker_core::config::{CaretakerConfig, GeneralConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let general = logging_config(&cli).await;
    if let Err(e) = logging::init_tracing(&general, cli.log_level.as_deref()) {
        eprintln!("{} {e}", "warning:".yellow().bold());
    }

    tracing::debug!(config = %cli.config.display(), "caretaker starting");

    let writer = OutputWriter::new(cli.output);
    let result: Result<(), CliError> = match cli.command {
        Commands::Check(args) => commands::check::execute(args, &cli.config, &writer).await,
        Commands::Tree(args) => commands::tree::execute(args, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}

/// Logging settings from the config file, or defaults.
///
/// A broken config file still gets logging; the command reports the error itself.
async fn logging_config(cli: &Cli) -> GeneralConfig {
    CaretakerConfig::load_or_default(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_default()
}
