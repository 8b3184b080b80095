//! Google Calendar listing for agenda.
//!
//! Requests the upcoming window of events with an authenticated client and
//! renders them for the console.

pub mod client;
pub mod display;
pub mod types;

pub use client::{fetch_upcoming, CalendarClient, EventQuery};
pub use display::{display_events, render_events, render_events_in};
pub use types::{Event, EventStatus, EventTime};
