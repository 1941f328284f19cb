//! phstatus CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use phstatus_client::cli::{Cli, Command, ConfigAction};
use phstatus_client::commands::run::RunOptions;
use phstatus_client::config::ClientConfig;
use phstatus_client::error::{ClientError, ClientResult};
use phstatus_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else if cli.json_logs {
        TracingConfig::scheduled()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("error: {}", e);
            if let ClientError::Provider(err) = &e
                && err.is_transient()
            {
                eprintln!("hint: this looks transient, the next scheduled run may succeed");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path)?
    } else {
        ClientConfig::load()?
    };

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => phstatus_client::commands::config::dump(&config, &config_path),
            ConfigAction::Validate => phstatus_client::commands::config::validate(&config),
            ConfigAction::Path => phstatus_client::commands::config::path(&config_path),
        },
        None => {
            let options = RunOptions {
                date: cli.date,
                dry_run: cli.dry_run,
                events_file: cli.events_file,
            };
            phstatus_client::commands::run::run(&config, options).await?;
            Ok(())
        }
    }
}
