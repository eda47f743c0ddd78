//! Calendly data relayed by the backend

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The connected Calendly account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendlyUser {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Public booking page shared with contacts.
    pub scheduling_url: Option<String>,
}

/// A bookable meeting kind, e.g. a 30 minute intro call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendlyEventType {
    pub name: String,
    /// Minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub scheduling_url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A booked meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub name: String,
    /// RFC 3339, as Calendly sends it.
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ScheduledEvent {
    /// `None` when the backend sent something that is not RFC 3339.
    pub fn start(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.start_time).ok()
    }

    pub fn duration_minutes(&self) -> Option<i64> {
        let end = DateTime::parse_from_rfc3339(self.end_time.as_deref()?).ok()?;
        Some((end - self.start()?).num_minutes())
    }
}

/// Body of `GET /calendly/event-types`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventTypeList {
    pub event_types: Vec<CalendlyEventType>,
}

/// Body of `GET /calendly/scheduled-events`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduledEventList {
    pub events: Vec<ScheduledEvent>,
}
