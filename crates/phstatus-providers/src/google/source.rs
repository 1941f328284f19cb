//! [`EventSource`] backed by a Google Calendar.

use phstatus_core::{AllDayEvent, LookaheadWindow};
use tracing::{debug, instrument};

use crate::error::ProviderResult;
use crate::source::{BoxFuture, EventSource, restrict_to_window};

use super::auth::ServiceAccountAuth;
use super::client::{GoogleCalendarClient, utc_midnight};
use super::config::GoogleConfig;

const PROVIDER_NAME: &str = "google";

/// Reads all-day events from a Google Calendar with a service account.
///
/// A new access token is requested on every fetch; the process runs once and
/// exits, so there is nothing to cache it in.
#[derive(Debug)]
pub struct GoogleCalendarSource {
    config: GoogleConfig,
    auth: ServiceAccountAuth,
}

impl GoogleCalendarSource {
    /// Creates a source from `config`.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config
            .service_account
            .validate()
            .map_err(|e| e.with_provider(PROVIDER_NAME))?;
        let auth = ServiceAccountAuth::new(
            config.service_account.clone(),
            config.scopes.clone(),
            config.timeout,
        )?;
        Ok(Self { config, auth })
    }

    /// The configured calendar ID.
    pub fn calendar_id(&self) -> &str {
        &self.config.calendar_id
    }

    #[instrument(skip(self), fields(calendar = %self.config.calendar_id))]
    async fn fetch(&self, window: LookaheadWindow) -> ProviderResult<Vec<AllDayEvent>> {
        let token = self.auth.access_token().await?;
        let client = GoogleCalendarClient::new(&self.config.api_base, token, self.config.timeout)?;

        let events = client
            .list_all_day_events(
                &self.config.calendar_id,
                utc_midnight(window.first_day()),
                utc_midnight(window.end_exclusive()),
            )
            .await?;

        let events = restrict_to_window(events, window);
        debug!(count = events.len(), "all-day events in window");
        Ok(events)
    }
}

impl EventSource for GoogleCalendarSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_events(&self, window: LookaheadWindow) -> BoxFuture<'_, ProviderResult<Vec<AllDayEvent>>> {
        Box::pin(async move {
            self.fetch(window)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }
}
