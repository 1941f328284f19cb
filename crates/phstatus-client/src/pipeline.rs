//! One run: fetch, merge, decide, compose, apply, notify.
//!
//! Each step only runs if the previous one produced something to act on:
//! no holiday in the window means neither Slack nor ntfy is contacted, and an
//! unchanged status is neither re-applied nor re-announced.

use chrono::{NaiveDate, TimeZone};
use phstatus_core::{
    Decision, LookaheadWindow, MergeOptions, StatusComposer, StatusUpdate, decide_in, merge_events,
};
use phstatus_providers::{EventSource, Notifier, StatusSink};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::error::ClientResult;

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// No holiday in the lookahead window.
    NoHoliday,
    /// Nothing was applied because no sink was given.
    DryRun {
        decision: Decision,
        status: StatusUpdate,
    },
    /// The sink already shows this status.
    Unchanged { status: StatusUpdate },
    /// The status was applied.
    Applied {
        status: StatusUpdate,
        notified: bool,
    },
}

impl RunOutcome {
    /// The status that was composed, if any.
    pub fn status(&self) -> Option<&StatusUpdate> {
        match self {
            Self::NoHoliday => None,
            Self::DryRun { status, .. } | Self::Unchanged { status } | Self::Applied { status, .. } => {
                Some(status)
            }
        }
    }
}

/// The collaborators a run talks to.
///
/// Without a sink the run stops after composing the status (dry run); the
/// notifier is optional either way.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub source: &'a dyn EventSource,
    pub sink: Option<&'a dyn StatusSink>,
    pub notifier: Option<&'a dyn Notifier>,
}

/// Settings of a run that do not involve I/O.
#[derive(Debug, Clone)]
pub struct RunSettings<Tz: TimeZone> {
    pub today: NaiveDate,
    pub merge: MergeOptions,
    pub composer: StatusComposer,
    /// Timezone the status expiration is computed in.
    pub timezone: Tz,
}

/// Runs the pipeline once.
///
/// Fetch, merge and sink failures abort the run. A notifier failure is
/// logged and reported through [`RunOutcome::Applied::notified`].
#[instrument(skip_all, fields(today = %settings.today, source = collaborators.source.name()))]
pub async fn run_once<Tz: TimeZone>(
    collaborators: Collaborators<'_>,
    settings: &RunSettings<Tz>,
) -> ClientResult<RunOutcome> {
    let window = LookaheadWindow::new(settings.today);
    let events = collaborators.source.fetch_events(window).await?;
    debug!(count = events.len(), "fetched events");

    let spans = merge_events(&events, settings.merge)?;
    let decision = decide_in(&spans, window);

    let Some(status) = settings.composer.compose(&decision, &settings.timezone) else {
        info!("no public holiday in the next {} days", window.days);
        return Ok(RunOutcome::NoHoliday);
    };
    info!(decision = decision.kind(), status = %status.text, "holiday found");

    let Some(sink) = collaborators.sink else {
        return Ok(RunOutcome::DryRun { decision, status });
    };

    if let Some(current) = sink.current_status().await?
        && current.same_display(&status)
    {
        info!(sink = sink.name(), "status already set, nothing to do");
        return Ok(RunOutcome::Unchanged { status });
    }

    sink.apply_status(&status).await?;
    info!(sink = sink.name(), text = %status.text, emoji = %status.emoji, "status updated");

    let notified = match (collaborators.notifier, settings.composer.notification(&decision)) {
        (Some(notifier), Some(message)) => match notifier.notify(&message).await {
            Ok(()) => true,
            Err(e) => {
                error!(notifier = notifier.name(), error = %e, "failed to send notification");
                false
            }
        },
        _ => false,
    };

    Ok(RunOutcome::Applied { status, notified })
}
