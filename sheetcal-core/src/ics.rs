//! iCalendar serialization of feeds.

use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use crate::event::{Event, EventTime};
use crate::feed::Feed;

const PRODID: &str = "-//sheetcal//sheetcal//EN";

/// Serialize one feed as RFC 5545 text.
///
/// Output is deterministic for identical input except DTSTAMP, which carries
/// the generation time.
pub fn feed_to_ics(feed: &Feed) -> String {
    let mut cal = Calendar::new();
    cal.name(&feed.name);

    for event in &feed.events {
        cal.push(event_to_vevent(event));
    }

    let cal = cal.done();
    strip_ics_bloat(&cal.to_string())
}

fn event_to_vevent(event: &Event) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);

    // DTSTAMP is required by RFC 5545 and is the one field that may differ
    // between runs over identical input.
    let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    add_time_property(&mut ics_event, "DTSTART", &event.start);
    add_time_property(&mut ics_event, "DTEND", &event.end);

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    if let Some(ref loc) = event.location {
        ics_event.location(loc);
    }

    if let Some(ref url) = event.url {
        ics_event.add_property("URL", url);
    }

    if let Some(ref rule) = event.rrule {
        ics_event.add_property("RRULE", rule);
    }

    ics_event.done()
}

/// Add a date or datetime property in the form matching the EventTime
/// variant: `VALUE=DATE` for all-day values, UTC with `Z` for timed ones.
fn add_time_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::DateTime(dt) => {
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%SZ").to_string());
        }
    }
}

/// Clean up ICS output from the icalendar crate:
/// - replace the crate's PRODID with ours
/// - drop CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
