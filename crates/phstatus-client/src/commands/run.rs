//! The default command: update the status once.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use phstatus_providers::google::GoogleCalendarSource;
use phstatus_providers::ntfy::NtfyNotifier;
use phstatus_providers::slack::SlackStatusSink;
use phstatus_providers::{EventSource, JsonFileSource, Notifier, StatusSink};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::pipeline::{Collaborators, RunOutcome, RunSettings, run_once};

/// Options of a single run, from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Date to evaluate; defaults to the local date.
    pub date: Option<NaiveDate>,
    /// Skip Slack and ntfy.
    pub dry_run: bool,
    /// Read events from this file instead of Google Calendar.
    pub events_file: Option<PathBuf>,
}

/// Builds the event source: the events file if given, Google otherwise.
pub fn build_source(config: &ClientConfig, events_file: Option<&PathBuf>) -> ClientResult<Box<dyn EventSource>> {
    if let Some(path) = events_file {
        debug!(path = %path.display(), "using events file");
        return Ok(Box::new(JsonFileSource::new(path)));
    }
    let google = config.google()?.to_source_config()?;
    Ok(Box::new(GoogleCalendarSource::new(google)?))
}

/// Builds the notifier, if an `[ntfy]` section is configured.
pub fn build_notifier(config: &ClientConfig) -> ClientResult<Option<NtfyNotifier>> {
    let Some(ntfy) = &config.ntfy else {
        return Ok(None);
    };
    let topic = ntfy.resolve_topic()?;
    Ok(Some(NtfyNotifier::new(&ntfy.server, &topic)?))
}

/// Runs the pipeline once and prints what happened.
pub async fn run(config: &ClientConfig, options: RunOptions) -> ClientResult<RunOutcome> {
    let source = build_source(config, options.events_file.as_ref())?;

    let (sink, notifier) = if options.dry_run {
        (None, None)
    } else {
        let sink = SlackStatusSink::new(config.slack()?.to_sink_config()?)?;
        (Some(sink), build_notifier(config)?)
    };

    let settings = RunSettings {
        today: options.date.unwrap_or_else(|| Local::now().date_naive()),
        merge: config.status.merge_options(),
        composer: config.status.composer(),
        timezone: Local,
    };

    let collaborators = Collaborators {
        source: source.as_ref(),
        sink: sink.as_ref().map(|s| s as &dyn StatusSink),
        notifier: notifier.as_ref().map(|n| n as &dyn Notifier),
    };

    let outcome = run_once(collaborators, &settings).await?;
    print_outcome(&outcome);
    Ok(outcome)
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NoHoliday => println!("No public holiday in the next few days."),
        RunOutcome::DryRun { decision, status } => {
            println!("decision: {}", decision.kind());
            println!("status:   {} {}", status.emoji, status.text);
            println!("expires:  {}", status.expiration);
        }
        RunOutcome::Unchanged { status } => println!("Status unchanged: {}", status.text),
        RunOutcome::Applied { status, notified } => {
            println!("Status set: {} {}", status.emoji, status.text);
            if !notified {
                println!("(no notification sent)");
            }
        }
    }
}
