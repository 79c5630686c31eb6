use analyse_runner::cli::{log_filter, Cli, Commands};
use analyse_runner::commands;
use analyse_runner::watchdog::PendingSignals;
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

/// Exit code for errors that abort the run before a result is reported
const EXIT_FATAL: i32 = 2;
const EXIT_INTERRUPTED: i32 = 130;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        Env::default().default_filter_or(log_filter(cli.command.verbosity())),
    )
    .init();

    match run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_FATAL);
        }
    }
}

fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::ClearCache {
            config, cache_dir, ..
        } => {
            commands::handle_clear_cache(config.as_deref(), cache_dir.as_deref())?;
            Ok(0)
        }
        Commands::CacheStats {
            config, cache_dir, ..
        } => {
            commands::handle_cache_stats(config.as_deref(), cache_dir.as_deref())?;
            Ok(0)
        }
        command @ Commands::Analyse { .. } => {
            let signals = PendingSignals::sigint(|| {
                eprintln!("Analysis interrupted");
                std::process::exit(EXIT_INTERRUPTED);
            });
            if let Err(e) = signals.install() {
                log::warn!("Failed to install interrupt handler: {}", e);
            }

            let config = command
                .into_analyse_config()
                .context("Expected analyse arguments")?;
            commands::handle_analyse(config, signals)
        }
    }
}
