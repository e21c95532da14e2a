//! Voicenote CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voicenote::cli::{handle_config_command, load_merged_config, run_record, run_recover};
use voicenote::cli::{Cli, Commands};
use voicenote::domain::config::AppConfig;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Record {
            realtime,
            translate,
            max_secs,
        } => {
            let cli_config = AppConfig {
                realtime: if realtime { Some(true) } else { None },
                target_language: translate,
                ..AppConfig::empty()
            };
            let config = load_merged_config(cli_config).await;
            run_record(config, max_secs).await
        }
        Commands::Recover { discard } => run_recover(discard).await,
        Commands::Config { action } => handle_config_command(action).await,
    }
}
