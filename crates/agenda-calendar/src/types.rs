//! Calendar API types and data structures.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Calendar event as displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub calendar_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub all_day: bool,
    pub status: EventStatus,
    pub html_link: Option<String>,
}

/// Event time - can be a specific datetime or an all-day date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

/// Event status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

// API Response Types

/// Google Calendar API event resource (the fields we read).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
    pub status: Option<String>,
    pub html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

/// API response for event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

impl Event {
    /// Convert an API event. Returns `None` when it has no usable start time.
    pub fn from_api(api: ApiEvent, calendar_id: &str) -> Option<Self> {
        let (start, all_day) = api.start.as_ref().and_then(parse_event_time)?;

        let end = api
            .end
            .as_ref()
            .and_then(parse_event_time)
            .map(|(time, _)| time)
            .unwrap_or_else(|| start.clone());

        let status = match api.status.as_deref() {
            Some("tentative") => EventStatus::Tentative,
            Some("cancelled") => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        };

        Some(Self {
            id: api.id,
            calendar_id: calendar_id.to_string(),
            summary: api.summary.unwrap_or_default(),
            description: api.description.filter(|d| !d.is_empty()),
            location: api.location.filter(|l| !l.is_empty()),
            start,
            end,
            all_day,
            status,
            html_link: api.html_link,
        })
    }
}

fn parse_event_time(api: &ApiEventTime) -> Option<(EventTime, bool)> {
    if let Some(dt_str) = &api.date_time {
        if let Ok(dt) = DateTime::parse_from_rfc3339(dt_str) {
            return Some((EventTime::DateTime(dt.with_timezone(&Utc)), false));
        }
    }
    if let Some(date_str) = &api.date {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
            return Some((EventTime::Date(date), true));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_event_from_api() {
        let json = r#"{
            "id": "event123",
            "summary": "Team Meeting",
            "description": "Weekly sync",
            "location": "Conference Room A",
            "start": {"dateTime": "2024-02-01T10:00:00-05:00", "timeZone": "America/New_York"},
            "end": {"dateTime": "2024-02-01T11:00:00-05:00"},
            "status": "confirmed",
            "htmlLink": "https://calendar.google.com/event?id=123"
        }"#;

        let api_event: ApiEvent = serde_json::from_str(json).unwrap();
        let event = Event::from_api(api_event, "primary").unwrap();

        assert_eq!(event.id, "event123");
        assert_eq!(event.summary, "Team Meeting");
        assert_eq!(event.location, Some("Conference Room A".to_string()));
        assert_eq!(event.status, EventStatus::Confirmed);
        assert!(!event.all_day);
        assert_eq!(
            event.start,
            EventTime::DateTime("2024-02-01T15:00:00Z".parse().unwrap())
        );
    }

    #[test]
    fn test_all_day_event() {
        let json = r#"{
            "id": "event456",
            "summary": "Holiday",
            "start": {"date": "2024-02-01"},
            "end": {"date": "2024-02-02"}
        }"#;

        let api_event: ApiEvent = serde_json::from_str(json).unwrap();
        let event = Event::from_api(api_event, "primary").unwrap();

        assert!(event.all_day);
        assert_eq!(
            event.end,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap())
        );
    }

    #[test]
    fn test_event_without_start_is_skipped() {
        let api_event: ApiEvent =
            serde_json::from_str(r#"{"id": "broken", "summary": "No time"}"#).unwrap();
        assert!(Event::from_api(api_event, "primary").is_none());
    }

    #[test]
    fn test_missing_end_defaults_to_start() {
        let json = r#"{"id": "e", "start": {"dateTime": "2024-02-01T10:00:00Z"}}"#;
        let event = Event::from_api(serde_json::from_str(json).unwrap(), "primary").unwrap();
        assert_eq!(event.start, event.end);
        assert_eq!(event.summary, "");
    }
}
