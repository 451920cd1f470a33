//! Grouping mapped events into named feeds.

use crate::event::Event;
use crate::mapper::MappedRow;

/// One subscribable calendar: a name as entered in the sheet, a
/// filesystem-safe slug, and the events routed to it in input order.
#[derive(Debug, Clone)]
pub struct Feed {
    pub name: String,
    pub slug: String,
    pub events: Vec<Event>,
}

/// Group rows into feeds. Feed order is the first appearance of each
/// calendar name; event order within a feed is input order. Both matter for
/// deterministic output.
pub fn group_feeds(rows: Vec<MappedRow>) -> Vec<Feed> {
    let mut feeds: Vec<Feed> = Vec::new();

    for row in rows {
        match feeds.iter_mut().find(|f| f.name == row.calendar) {
            Some(feed) => feed.events.push(row.event),
            None => {
                let slug = unique_slug(&row.calendar, &feeds);
                feeds.push(Feed {
                    name: row.calendar,
                    slug,
                    events: vec![row.event],
                });
            }
        }
    }

    feeds
}

/// Slug for a feed name, disambiguated against already-created feeds so two
/// distinct names never share an output file.
fn unique_slug(name: &str, existing: &[Feed]) -> String {
    let base = slugify(name);

    if !existing.iter().any(|f| f.slug == base) {
        return base;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !existing.iter().any(|f| f.slug == candidate) {
            return candidate;
        }
        n += 1;
    }
}

pub fn slugify(name: &str) -> String {
    let s = slug::slugify(name);
    if s.is_empty() { "calendar".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;
    use chrono::NaiveDate;

    fn row(calendar: &str, title: &str) -> MappedRow {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        MappedRow {
            calendar: calendar.to_string(),
            event: Event {
                uid: format!("{title}@test"),
                summary: title.to_string(),
                start: EventTime::Date(day),
                end: EventTime::Date(day.succ_opt().unwrap()),
                location: None,
                description: None,
                url: None,
                rrule: None,
            },
        }
    }

    #[test]
    fn test_first_appearance_order() {
        let feeds = group_feeds(vec![
            row("work", "a"),
            row("home", "b"),
            row("work", "c"),
        ]);

        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0].name, "work");
        assert_eq!(feeds[1].name, "home");
        assert_eq!(feeds[0].events.len(), 2);
        assert_eq!(feeds[0].events[0].summary, "a");
        assert_eq!(feeds[0].events[1].summary, "c");
        assert_eq!(feeds[1].events[0].summary, "b");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Work Events!"), "work-events");
        assert_eq!(slugify("  "), "calendar");
        assert_eq!(slugify("Ünïcödé"), "unicode");
    }

    #[test]
    fn test_colliding_slugs_get_suffixes() {
        let feeds = group_feeds(vec![row("Work!", "a"), row("work", "b")]);

        assert_eq!(feeds[0].slug, "work");
        assert_eq!(feeds[1].slug, "work-2");
    }
}
