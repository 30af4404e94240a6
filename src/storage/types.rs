//! Record types for the `events` collection

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

const ISO_DATE: &str = "%Y-%m-%d";

/// One conference/event occurrence as stored in the `events` collection.
///
/// Dates are kept as ISO `yyyy-mm-dd` strings, matching the wire shape of the
/// store; consumers that need calendar arithmetic go through [`Event::start`]
/// and [`Event::end`], which treat unparseable values as absent rather than
/// failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Open product code; the known set is advisory, used for calendar coloring only.
    pub product: String,
    pub event_name: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub pm_attend: bool,
    /// Sign-up list; insertion order is sign-up order. No duplicates
    /// (trimmed, case-sensitive) within one event.
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default = "default_booth_size", deserialize_with = "booth_size_or_one")]
    pub booth_size: u32,
}

impl Event {
    /// Parsed start date, `None` when the stored string is not a valid ISO date.
    pub fn start(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.start_date, ISO_DATE).ok()
    }

    /// Parsed end date, `None` when the stored string is not a valid ISO date.
    pub fn end(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.end_date, ISO_DATE).ok()
    }

    /// Whether the event's date range covers `date` (inclusive on both ends).
    /// Events with unparseable dates never cover anything.
    pub fn covers(&self, date: NaiveDate) -> bool {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => start <= date && date <= end,
            (Some(start), None) => start == date,
            _ => false,
        }
    }
}

/// Insert payload for the `events` collection: everything the store does not
/// assign itself (`id`, `created_at`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub product: String,
    pub event_name: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub location: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub pm_attend: bool,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default = "default_booth_size", deserialize_with = "booth_size_or_one")]
    pub booth_size: u32,
}

impl NewEvent {
    /// Fill in defaults: a missing or empty `end_date` becomes `start_date`.
    pub fn normalize(mut self) -> Self {
        let end = self
            .end_date
            .take()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        self.end_date = Some(end.unwrap_or_else(|| self.start_date.trim().to_string()));
        self
    }

    /// Manual-registration rules: non-empty name, parseable start date, and
    /// `end_date >= start_date` when both parse. Bulk import skips this and
    /// lets the store reject bad rows instead.
    pub fn validate(&self) -> Result<(), String> {
        if self.event_name.trim().is_empty() {
            return Err("event_name must not be empty".to_string());
        }
        let start = NaiveDate::parse_from_str(self.start_date.trim(), ISO_DATE)
            .map_err(|_| format!("start_date is not a valid date: {:?}", self.start_date))?;
        if let Some(end) = self
            .end_date
            .as_deref()
            .and_then(|e| NaiveDate::parse_from_str(e.trim(), ISO_DATE).ok())
        {
            if end < start {
                return Err(format!(
                    "end_date {} is before start_date {}",
                    end, start
                ));
            }
        }
        Ok(())
    }
}

fn default_booth_size() -> u32 {
    1
}

/// Tolerant `booth_size` decoding: a positive number, a numeric string, or
/// anything else (including absent/null/junk) which falls back to 1.
fn booth_size_or_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Raw::deserialize(deserializer) {
        Ok(Raw::Num(n)) if n >= 1 => n as u32,
        Ok(Raw::Text(s)) => s
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| n as u32)
            .unwrap_or(1),
        _ => 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json(booth: &str) -> String {
        format!(
            r#"{{"id":"e1","created_at":"2025-03-01T00:00:00Z","product":"EGL",
                "event_name":"KSC Spring","start_date":"2025-03-01",
                "end_date":"2025-03-02","booth_size":{booth}}}"#
        )
    }

    #[test]
    fn booth_size_accepts_number_string_and_junk() {
        let ev: Event = serde_json::from_str(&minimal_json("3")).unwrap();
        assert_eq!(ev.booth_size, 3);
        let ev: Event = serde_json::from_str(&minimal_json("\"2\"")).unwrap();
        assert_eq!(ev.booth_size, 2);
        let ev: Event = serde_json::from_str(&minimal_json("\"big\"")).unwrap();
        assert_eq!(ev.booth_size, 1);
        let ev: Event = serde_json::from_str(&minimal_json("null")).unwrap();
        assert_eq!(ev.booth_size, 1);
        let ev: Event = serde_json::from_str(&minimal_json("0")).unwrap();
        assert_eq!(ev.booth_size, 1);
    }

    #[test]
    fn booth_size_defaults_when_absent() {
        let ev: Event = serde_json::from_str(
            r#"{"id":"e1","created_at":"2025-03-01T00:00:00Z","product":"EGL",
                "event_name":"KSC Spring","start_date":"2025-03-01","end_date":"2025-03-01"}"#,
        )
        .unwrap();
        assert_eq!(ev.booth_size, 1);
        assert!(ev.attendees.is_empty());
        assert!(!ev.pm_attend);
    }

    #[test]
    fn normalize_defaults_end_date_to_start_date() {
        let ev = NewEvent {
            product: "EGL".into(),
            event_name: "KSC Spring".into(),
            organizer: String::new(),
            location: String::new(),
            start_date: "2025-03-01".into(),
            end_date: None,
            pm_attend: false,
            attendees: vec![],
            booth_size: 1,
        };
        assert_eq!(ev.normalize().end_date.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn normalize_keeps_explicit_end_date() {
        let ev = NewEvent {
            product: "EGL".into(),
            event_name: "KSC Spring".into(),
            organizer: String::new(),
            location: String::new(),
            start_date: "2025-03-01".into(),
            end_date: Some("2025-03-04".into()),
            pm_attend: false,
            attendees: vec![],
            booth_size: 1,
        };
        assert_eq!(ev.normalize().end_date.as_deref(), Some("2025-03-04"));
    }

    #[test]
    fn validate_rejects_empty_name_and_bad_dates() {
        let mut ev = NewEvent {
            product: "EGL".into(),
            event_name: "  ".into(),
            organizer: String::new(),
            location: String::new(),
            start_date: "2025-03-01".into(),
            end_date: None,
            pm_attend: false,
            attendees: vec![],
            booth_size: 1,
        };
        assert!(ev.validate().is_err());

        ev.event_name = "KSC Spring".into();
        ev.start_date = "not-a-date".into();
        assert!(ev.validate().is_err());

        ev.start_date = "2025-03-10".into();
        ev.end_date = Some("2025-03-01".into());
        assert!(ev.validate().is_err());

        ev.end_date = Some("2025-03-10".into());
        assert!(ev.validate().is_ok());
    }

    #[test]
    fn covers_is_inclusive_on_both_ends() {
        let ev: Event = serde_json::from_str(&minimal_json("1")).unwrap();
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(ev.covers(d("2025-03-01")));
        assert!(ev.covers(d("2025-03-02")));
        assert!(!ev.covers(d("2025-03-03")));
    }
}
