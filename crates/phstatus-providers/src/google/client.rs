//! Google Calendar API client.
//!
//! Low-level HTTP client for the `events.list` endpoint. Only all-day events
//! survive conversion; timed and cancelled events are dropped here.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use phstatus_core::AllDayEvent;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl GoogleCalendarClient {
    /// Creates a new client with the given access token.
    pub fn new(
        api_base: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            http_client,
            api_base: api_base.into(),
            access_token: access_token.into(),
        })
    }

    /// Lists the all-day events of `calendar_id` between `time_min` and `time_max`.
    ///
    /// Recurring events are expanded server-side and results are ordered by
    /// start time. All pages are fetched.
    pub async fn list_all_day_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> ProviderResult<Vec<AllDayEvent>> {
        let mut all_events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .list_events_page(calendar_id, time_min, time_max, page_token.as_deref())
                .await?;

            for item in page.items {
                if let Some(event) = convert_event(item)? {
                    all_events.push(event);
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            "fetched {} all-day events from calendar {}",
            all_events.len(),
            calendar_id
        );
        Ok(all_events)
    }

    /// Fetches a single page of events.
    async fn list_events_page(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> ProviderResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(calendar_id)
        );

        let mut request = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("request timeout")
            } else if e.is_connect() {
                ProviderError::network(format!("connection failed: {}", e))
            } else {
                ProviderError::network(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        parse_event_list(&body)
    }
}

fn parse_event_list(body: &str) -> ProviderResult<EventListResponse> {
    serde_json::from_str(body)
        .map_err(|e| ProviderError::invalid_response(format!("failed to parse response: {}", e)))
}

/// Converts an API event to an [`AllDayEvent`].
///
/// Returns `Ok(None)` for cancelled and timed events.
fn convert_event(event: ApiEvent) -> ProviderResult<Option<AllDayEvent>> {
    if event.status.as_deref() == Some("cancelled") {
        return Ok(None);
    }

    let (Some(start), Some(end)) = (event.start.date, event.end.date) else {
        if event.start.date_time.is_none() {
            warn!(id = ?event.id, "event has neither a start date nor a start time");
        }
        return Ok(None);
    };

    let summary = event.summary.unwrap_or_default();
    AllDayEvent::parse(&start, &end, summary).map(Some).map_err(|e| {
        ProviderError::invalid_response(format!(
            "calendar returned an invalid all-day event {}: {}",
            event.id.as_deref().unwrap_or("<no id>"),
            e
        ))
        .with_source(e)
    })
}

/// Midnight UTC at the start of `date`, the format Google expects for bounds.
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

/// A single event from the Google Calendar API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    #[serde(default)]
    start: ApiEventTime,
    #[serde(default)]
    end: ApiEventTime,
    status: Option<String>,
}

/// Event time from the API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_event_list_response() {
        let json = r#"{
            "items": [
                {
                    "id": "20240210_holiday",
                    "summary": "Thaipusam Holiday",
                    "start": {"date": "2024-02-10"},
                    "end": {"date": "2024-02-11"},
                    "status": "confirmed"
                },
                {
                    "id": "standup",
                    "summary": "Standup",
                    "start": {"dateTime": "2024-02-10T09:00:00+08:00"},
                    "end": {"dateTime": "2024-02-10T09:15:00+08:00"}
                }
            ],
            "nextPageToken": "page-2"
        }"#;

        let response = parse_event_list(json).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.next_page_token.as_deref(), Some("page-2"));
    }

    #[test]
    fn converts_all_day_event() {
        let json = r#"{
            "id": "evt",
            "summary": "Thaipusam (Regional Holiday)",
            "start": {"date": "2024-02-11"},
            "end": {"date": "2024-02-12"}
        }"#;
        let event: ApiEvent = serde_json::from_str(json).unwrap();
        let converted = convert_event(event).unwrap().unwrap();
        assert_eq!(converted.start_date, date(2024, 2, 11));
        assert_eq!(converted.end_date, date(2024, 2, 12));
        assert_eq!(converted.summary, "Thaipusam (Regional Holiday)");
    }

    #[test]
    fn skips_timed_event() {
        let json = r#"{
            "id": "evt",
            "summary": "Standup",
            "start": {"dateTime": "2024-02-10T09:00:00Z"},
            "end": {"dateTime": "2024-02-10T09:15:00Z"}
        }"#;
        let event: ApiEvent = serde_json::from_str(json).unwrap();
        assert!(convert_event(event).unwrap().is_none());
    }

    #[test]
    fn skips_cancelled_event() {
        let json = r#"{
            "id": "evt",
            "status": "cancelled",
            "start": {"date": "2024-02-10"},
            "end": {"date": "2024-02-11"}
        }"#;
        let event: ApiEvent = serde_json::from_str(json).unwrap();
        assert!(convert_event(event).unwrap().is_none());
    }

    #[test]
    fn malformed_date_fails() {
        let json = r#"{
            "id": "evt",
            "summary": "Broken",
            "start": {"date": "2024/02/10"},
            "end": {"date": "2024-02-11"}
        }"#;
        let event: ApiEvent = serde_json::from_str(json).unwrap();
        let err = convert_event(event).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn missing_summary_becomes_empty() {
        let json = r#"{"id": "evt", "start": {"date": "2024-02-10"}, "end": {"date": "2024-02-11"}}"#;
        let event: ApiEvent = serde_json::from_str(json).unwrap();
        assert_eq!(convert_event(event).unwrap().unwrap().summary, "");
    }

    #[test]
    fn utc_midnight_bounds() {
        assert_eq!(
            utc_midnight(date(2024, 2, 9)).to_rfc3339(),
            "2024-02-09T00:00:00+00:00"
        );
    }
}
