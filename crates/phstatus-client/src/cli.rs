//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// phstatus - Public holidays in your Slack status
#[derive(Debug, Parser)]
#[command(name = "phstatus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "PHSTATUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log as JSON lines (for cron and systemd timers)
    #[arg(long)]
    pub json_logs: bool,

    /// Print the decision and status without touching Slack or ntfy
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Read events from a JSON file instead of Google Calendar
    #[arg(long, env = "PHSTATUS_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,
    /// Validate configuration
    Validate,
    /// Show configuration file path
    Path,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, phstatus_core::DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from([
            "phstatus",
            "--dry-run",
            "--date",
            "2024-02-09",
            "--events-file",
            "holidays.json",
        ])
        .unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 2, 9));
        assert_eq!(cli.events_file, Some(PathBuf::from("holidays.json")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(Cli::try_parse_from(["phstatus", "--date", "09/02/2024"]).is_err());
    }

    #[test]
    fn parses_config_subcommand() {
        let cli = Cli::try_parse_from(["phstatus", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Validate
            })
        ));
    }
}
