//! Calendar feed entries and the product color palette
//!
//! The calendar widget itself is an external collaborator; this module only
//! supplies the render-ready data contract, including a color hint per
//! product code.

use serde::Serialize;

use crate::storage::Event;

/// Advisory palette for the known product codes. `product` is an open
/// string; unknown codes get the neutral default.
const PRODUCT_COLORS: &[(&str, &str)] = &[
    ("EGL", "#ef4444"),
    ("HER", "#f472b6"),
    ("NOV", "#22c55e"),
    ("RAD", "#38bdf8"),
    ("UPL", "#d946ef"),
    ("VAD", "#8b5cf6"),
];

const DEFAULT_COLOR: &str = "#64748b";

/// Hex color hint for a product code.
pub fn product_color(product: &str) -> &'static str {
    PRODUCT_COLORS
        .iter()
        .find(|(code, _)| *code == product)
        .map(|(_, hex)| *hex)
        .unwrap_or(DEFAULT_COLOR)
}

/// One render-ready calendar entry.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEntry {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub product: String,
    pub color: &'static str,
}

/// Map the event collection to calendar entries. No filtering or sorting;
/// the caller passes whatever slice it wants rendered.
pub fn calendar_entries(events: &[Event]) -> Vec<CalendarEntry> {
    events
        .iter()
        .map(|ev| CalendarEntry {
            id: ev.id.clone(),
            title: ev.event_name.clone(),
            start: ev.start_date.clone(),
            end: ev.end_date.clone(),
            location: ev.location.clone(),
            product: ev.product.clone(),
            color: product_color(&ev.product),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn known_products_get_their_palette_color() {
        assert_eq!(product_color("EGL"), "#ef4444");
        assert_eq!(product_color("VAD"), "#8b5cf6");
    }

    #[test]
    fn unknown_products_get_the_neutral_default() {
        assert_eq!(product_color("XYZ"), DEFAULT_COLOR);
        assert_eq!(product_color(""), DEFAULT_COLOR);
    }

    #[test]
    fn entries_carry_the_product_color() {
        let events = vec![Event {
            id: "e1".into(),
            created_at: Utc::now(),
            product: "NOV".into(),
            event_name: "KSC Spring".into(),
            organizer: String::new(),
            location: "Seoul".into(),
            start_date: "2025-03-01".into(),
            end_date: "2025-03-02".into(),
            pm_attend: false,
            attendees: vec![],
            booth_size: 1,
        }];
        let entries = calendar_entries(&events);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].color, "#22c55e");
        assert_eq!(entries[0].title, "KSC Spring");
    }
}
