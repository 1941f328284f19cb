//! Offline event source backed by a JSON file.
//!
//! The file holds an array of all-day events:
//!
//! ```json
//! [
//!   {"start": "2024-02-10", "end": "2024-02-11", "summary": "Thaipusam Holiday"},
//!   {"start": "2024-02-11", "end": "2024-02-12", "summary": "Thaipusam (Regional Holiday)"}
//! ]
//! ```

use std::path::{Path, PathBuf};

use phstatus_core::{AllDayEvent, LookaheadWindow};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::source::{BoxFuture, EventSource, restrict_to_window};

/// One entry of the events file, dates still unparsed.
#[derive(Debug, Deserialize)]
struct FileEvent {
    start: String,
    end: String,
    summary: String,
}

/// Reads events from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Creates a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the events file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ProviderResult<Vec<AllDayEvent>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::configuration(format!(
                "failed to read events file {}: {}",
                self.path.display(),
                e
            ))
            .with_source(e)
        })?;
        parse_events(&content)
    }
}

/// Parses the events file format.
pub fn parse_events(json: &str) -> ProviderResult<Vec<AllDayEvent>> {
    let entries: Vec<FileEvent> = serde_json::from_str(json)
        .map_err(|e| ProviderError::invalid_response(format!("invalid events file: {}", e)))?;

    entries
        .into_iter()
        .map(|entry| {
            AllDayEvent::parse(&entry.start, &entry.end, entry.summary).map_err(|e| {
                ProviderError::invalid_response(format!("invalid event in events file: {}", e))
                    .with_source(e)
            })
        })
        .collect()
}

impl EventSource for JsonFileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch_events(&self, window: LookaheadWindow) -> BoxFuture<'_, ProviderResult<Vec<AllDayEvent>>> {
        Box::pin(async move {
            let events = self.load().map_err(|e| e.with_provider("file"))?;
            let total = events.len();
            let events = restrict_to_window(events, window);
            debug!(path = %self.path.display(), total, kept = events.len(), "loaded events file");
            Ok(events)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use chrono::NaiveDate;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SAMPLE: &str = r#"[
        {"start": "2024-02-11", "end": "2024-02-12", "summary": "Thaipusam (Regional Holiday)"},
        {"start": "2024-02-10", "end": "2024-02-11", "summary": "Thaipusam Holiday"},
        {"start": "2024-03-28", "end": "2024-03-29", "summary": "Nuzul Al-Quran"}
    ]"#;

    #[test]
    fn parses_all_entries() {
        let events = parse_events(SAMPLE).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].start_date, date(2024, 2, 10));
    }

    #[test]
    fn malformed_date_is_invalid_response() {
        let json = r#"[{"start": "2024-13-01", "end": "2024-13-02", "summary": "Nope"}]"#;
        let err = parse_events(json).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(err.message().contains("invalid event data"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let json = r#"[{"start": "2024-02-12", "end": "2024-02-10", "summary": "Backwards"}]"#;
        assert!(parse_events(json).is_err());
    }

    #[tokio::test]
    async fn fetch_restricts_to_window_and_sorts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = JsonFileSource::new(file.path());
        let events = source
            .fetch_events(LookaheadWindow::new(date(2024, 2, 9)))
            .await
            .unwrap();

        let names: Vec<_> = events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(names, vec!["Thaipusam Holiday", "Thaipusam (Regional Holiday)"]);
    }

    #[tokio::test]
    async fn missing_file_is_configuration_error() {
        let source = JsonFileSource::new("/nonexistent/phstatus/events.json");
        let err = source
            .fetch_events(LookaheadWindow::new(date(2024, 2, 9)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
        assert_eq!(err.provider(), Some("file"));
    }
}
