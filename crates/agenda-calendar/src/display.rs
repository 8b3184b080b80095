//! Console rendering of an event listing.

use std::fmt;

use chrono::{Local, TimeZone};

use crate::types::{Event, EventTime};

/// Descriptions longer than this many characters are cut.
pub const DESCRIPTION_LIMIT: usize = 100;

const SEPARATOR: &str = "   ──────────────────────────────────────────";

/// Message shown when the window holds no events.
pub fn empty_message(window_days: u32) -> String {
    if window_days == 7 {
        "No upcoming events found in the next week.".to_string()
    } else {
        format!("No upcoming events found in the next {} days.", window_days)
    }
}

/// First `DESCRIPTION_LIMIT` characters, with `...` appended when cut.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Date and time in `tz`; date only for all-day events.
pub fn format_time<Tz>(time: &EventTime, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match time {
        EventTime::DateTime(dt) => dt.with_timezone(tz).format("%a %b %-d %Y, %H:%M").to_string(),
        EventTime::Date(d) => d.format("%a %b %-d %Y (all day)").to_string(),
    }
}

/// Render the listing with times shown in `tz`.
pub fn render_events_in<Tz>(events: &[Event], window_days: u32, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if events.is_empty() {
        return format!("{}\n", empty_message(window_days));
    }

    events
        .iter()
        .enumerate()
        .map(|(index, event)| format_event(index + 1, event, tz))
        .collect()
}

/// One numbered event block, ending with the separator line.
fn format_event<Tz>(number: usize, event: &Event, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let summary = if event.summary.is_empty() {
        "(no title)"
    } else {
        event.summary.as_str()
    };

    let mut block = format!(
        "📌 Event {}: {}\n   🕐 Start: {}\n   🏁 End: {}\n",
        number,
        summary,
        format_time(&event.start, tz),
        format_time(&event.end, tz),
    );
    if let Some(description) = &event.description {
        block.push_str(&format!(
            "   📝 Description: {}\n",
            truncate_description(description)
        ));
    }
    if let Some(location) = &event.location {
        block.push_str(&format!("   📍 Location: {}\n", location));
    }
    block.push_str(SEPARATOR);
    block.push('\n');
    block
}

/// Render the listing in the local time zone.
pub fn render_events(events: &[Event], window_days: u32) -> String {
    render_events_in(events, window_days, &Local)
}

/// Print the listing to stdout.
pub fn display_events(events: &[Event], window_days: u32) {
    print!("{}", render_events(events, window_days));
}
