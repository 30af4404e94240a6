//! Spreadsheet field mapping for bulk import
//!
//! Reads CSV exports of the original scheduling spreadsheet. Columns are
//! resolved by header, accepting the spreadsheet's Korean headers and their
//! snake_case English equivalents. Rows missing a product or event name are
//! dropped before submission; everything else is mapped leniently and left
//! for store-side validation.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::io::Read;
use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::NewEvent;

/// Spreadsheet day-serial epoch (Excel's, accounting for the 1900 leap bug).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// Excel's serial domain upper bound (9999-12-31).
const SERIAL_MAX: i64 = 2_958_465;

const PRODUCT_HEADERS: &[&str] = &["제품", "product"];
const EVENT_NAME_HEADERS: &[&str] = &["학회명", "event_name"];
const ORGANIZER_HEADERS: &[&str] = &["주관학회", "organizer"];
const LOCATION_HEADERS: &[&str] = &["장소", "location"];
const START_DATE_HEADERS: &[&str] = &["시작일", "start_date"];
const END_DATE_HEADERS: &[&str] = &["종료일", "end_date"];
const PM_ATTEND_HEADERS: &[&str] = &["PM 참석 여부", "pm_attend"];
const BOOTH_SIZE_HEADERS: &[&str] = &["부스 크기", "booth_size"];

/// Parsed import rows plus the count of rows dropped during mapping.
#[derive(Debug)]
pub struct ImportBatch {
    pub rows: Vec<NewEvent>,
    pub skipped: usize,
}

/// Outcome of a bulk import, reported back to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse a CSV export into an import batch.
///
/// The attendee list is always initialized empty: sign-ups happen post hoc
/// through explicit add-attendee actions, never through import.
pub fn parse_csv<R: Read>(reader: R) -> Result<ImportBatch> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();

    let product_col = require_column(&headers, PRODUCT_HEADERS)?;
    let event_name_col = require_column(&headers, EVENT_NAME_HEADERS)?;
    let start_date_col = require_column(&headers, START_DATE_HEADERS)?;
    let organizer_col = find_column(&headers, ORGANIZER_HEADERS);
    let location_col = find_column(&headers, LOCATION_HEADERS);
    let end_date_col = find_column(&headers, END_DATE_HEADERS);
    let pm_attend_col = find_column(&headers, PM_ATTEND_HEADERS);
    let booth_size_col = find_column(&headers, BOOTH_SIZE_HEADERS);

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in csv.records() {
        let record = record?;
        let cell = |col: Option<usize>| {
            col.and_then(|i| record.get(i)).unwrap_or("").trim().to_string()
        };

        let product = cell(Some(product_col));
        let event_name = cell(Some(event_name_col));
        if product.is_empty() || event_name.is_empty() {
            debug!("skipping import row without product or event name");
            skipped += 1;
            continue;
        }

        let start_date = normalize_date_cell(&cell(Some(start_date_col)));
        let end_date = match cell(end_date_col) {
            e if e.is_empty() => None,
            e => Some(normalize_date_cell(&e)),
        };

        rows.push(
            NewEvent {
                product,
                event_name,
                organizer: cell(organizer_col),
                location: cell(location_col),
                start_date,
                end_date,
                pm_attend: parse_pm_attend(&cell(pm_attend_col)),
                attendees: Vec::new(),
                booth_size: parse_booth_size(&cell(booth_size_col)),
            }
            .normalize(),
        );
    }

    Ok(ImportBatch { rows, skipped })
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim() == *n))
}

fn require_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    find_column(headers, names)
        .ok_or_else(|| Error::Validation(format!("missing import column {:?}", names[0])))
}

/// Normalize one date cell: a numeric day-serial becomes an ISO date, dotted
/// `YYYY.MM.DD` becomes dashed, everything else passes through unchanged.
/// Unparseable text is deliberately not corrected here; it fails validation
/// at the store instead.
pub fn normalize_date_cell(raw: &str) -> String {
    let text = raw.trim();

    if let Ok(serial) = text.parse::<i64>() {
        if (1..=SERIAL_MAX).contains(&serial) {
            let (y, m, d) = SERIAL_EPOCH;
            if let Some(epoch) = NaiveDate::from_ymd_opt(y, m, d) {
                return (epoch + Duration::days(serial)).format("%Y-%m-%d").to_string();
            }
        }
        return text.to_string();
    }

    if text.chars().all(|c| c.is_ascii_digit() || c == '.')
        && text.chars().filter(|c| *c == '.').count() == 2
    {
        return text.replace('.', "-");
    }

    text.to_string()
}

/// `1`, `"1"`, `"true"`, `"y"` (case-insensitive) mean yes; everything else no.
pub fn parse_pm_attend(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "y")
}

fn parse_booth_size(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n >= 1)
        .map(|n| n as u32)
        .unwrap_or(1)
}
