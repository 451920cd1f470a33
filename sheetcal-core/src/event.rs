//! Calendar event value types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A start or end instant. Date-only values come from all-day rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl EventTime {
    pub fn is_date(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Canonical text form, used for UID derivation. Must stay stable:
    /// changing it changes every derived UID in subscribers' calendars.
    pub fn canonical(&self) -> String {
        match self {
            EventTime::Date(d) => d.format("%Y-%m-%d").to_string(),
            EventTime::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }
}

/// One calendar event, fully resolved: the end is always materialized, either
/// from the sheet or from the documented default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// Recurrence rule, passed through to RRULE verbatim.
    pub rrule: Option<String>,
}
