//! Google Calendar API client.

use agenda_auth::AuthenticatedClient;
use agenda_core::{CalendarConfig, FetchError, ReqwestErrorExt};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use tracing::instrument;

use crate::types::{Event, EventListResponse};

/// Parameters of one events.list call.
///
/// Results are always ordered by start time, which Google only allows
/// together with `singleEvents=true`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub max_results: u32,
    pub single_events: bool,
}

impl EventQuery {
    /// Window `[now, now + window_days)`, recurring events expanded, earliest first.
    pub fn upcoming(now: DateTime<Utc>, config: &CalendarConfig) -> Result<Self, FetchError> {
        let time_max = Duration::try_days(i64::from(config.window_days))
            .and_then(|window| now.checked_add_signed(window))
            .ok_or(FetchError::WindowOutOfRange(config.window_days))?;

        Ok(Self {
            calendar_id: config.calendar_id.clone(),
            time_min: now,
            time_max,
            max_results: config.max_results,
            single_events: true,
        })
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timeMin", self.time_min.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("timeMax", self.time_max.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("maxResults", self.max_results.to_string()),
            ("singleEvents", self.single_events.to_string()),
            ("orderBy", "startTime".to_string()),
        ]
    }
}

pub struct CalendarClient<'a> {
    auth: &'a AuthenticatedClient,
    base_url: String,
}

impl<'a> CalendarClient<'a> {
    pub fn new(auth: &'a AuthenticatedClient, base_url: &str) -> Self {
        Self {
            auth,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// List the first page of events matching `query`.
    #[instrument(skip(self), level = "info")]
    pub async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>, FetchError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&query.calendar_id),
        );

        let request = self.auth.http().get(&url).query(&query.query_pairs());
        let response = self
            .auth
            .sign(request)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_fetch_error)?;

        let resp: EventListResponse = self.handle_response(response, &query.calendar_id).await?;

        if resp.next_page_token.is_some() {
            tracing::debug!("More events available beyond the first {}", query.max_results);
        }

        let events = resp
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.clone();
                let event = Event::from_api(item, &query.calendar_id);
                if event.is_none() {
                    tracing::warn!("Skipping event {} without a start time", id);
                }
                event
            })
            .collect();

        Ok(events)
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        calendar_id: &str,
    ) -> Result<T, FetchError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| FetchError::InvalidResponse(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(FetchError::Unauthorized)
        } else if status.as_u16() == 403 {
            Err(FetchError::Forbidden)
        } else if status.as_u16() == 404 {
            Err(FetchError::CalendarNotFound(calendar_id.to_string()))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(FetchError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(FetchError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

/// Fetch the upcoming window for the configured calendar.
pub async fn fetch_upcoming(
    auth: &AuthenticatedClient,
    config: &CalendarConfig,
    now: DateTime<Utc>,
) -> Result<Vec<Event>, FetchError> {
    let query = EventQuery::upcoming(now, config)?;
    CalendarClient::new(auth, &config.api_base_url)
        .list_events(&query)
        .await
}
