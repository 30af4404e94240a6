//! The attendance aggregation engine
//!
//! A pure computation: given the full in-memory event collection, the
//! employee directory, and a filter configuration, produce a ranked list of
//! per-employee attendance counts. No I/O, no caching, no mutation of the
//! inputs; callers re-run it from scratch on every filter change.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use crate::directory::Directory;
use crate::storage::Event;

use super::models::{AttendanceRow, ReportFilter};

/// Rank every directory employee by how many filtered events list them as an
/// attendee.
///
/// The output always has one row per employee passing the affiliation/group
/// filter, zero counts included, sorted by descending count with ties kept in
/// directory order. Events whose start date fails to parse are excluded, never
/// fatal: the engine is total over well-typed input.
pub fn rank(
    events: &[Event],
    directory: &Directory,
    filter: &ReportFilter,
    today: NaiveDate,
) -> Vec<AttendanceRow> {
    let mut counts: HashMap<&str, u32> = HashMap::new();

    for event in events.iter().filter(|ev| retain(ev, filter, today)) {
        for raw_name in &event.attendees {
            let name = raw_name.trim();
            if name.is_empty() {
                continue;
            }
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<AttendanceRow> = directory
        .iter()
        .filter(|emp| {
            filter
                .affiliation
                .as_deref()
                .map_or(true, |a| emp.affiliation == a)
                && filter.group.as_deref().map_or(true, |g| emp.group == g)
        })
        .map(|emp| AttendanceRow {
            name: emp.name.clone(),
            affiliation: emp.affiliation.clone(),
            group: emp.group.clone(),
            count: counts.get(emp.name.as_str()).copied().unwrap_or(0),
        })
        .collect();

    // Stable sort: ties keep directory order.
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

fn retain(event: &Event, filter: &ReportFilter, today: NaiveDate) -> bool {
    let Some(date) = event.start() else {
        debug!(
            event = %event.event_name,
            start_date = %event.start_date,
            "dropping event with unparseable start date"
        );
        return false;
    };
    if !filter.period.contains(date, today) {
        return false;
    }
    if !filter.day_type.matches(date) {
        return false;
    }
    if let Some(product) = filter.product.as_deref() {
        if event.product != product {
            return false;
        }
    }
    true
}
