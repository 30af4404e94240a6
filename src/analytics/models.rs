//! Filter model for the attendance aggregation engine

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const ISO_DATE: &str = "%Y-%m-%d";

/// Time-window selection, either relative to "today" or an explicit range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    /// No time constraint.
    All,
    /// From the start of the current month (exclusive) up to today.
    ThisMonth,
    /// From the start of the current year (exclusive) up to today.
    ThisYear,
    /// The last N months (exclusive lower bound) up to today.
    LastMonths(u32),
    /// Explicit range, inclusive on both ends; either bound may be open.
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl Period {
    /// Whether `date` falls inside the window, evaluated against `today`.
    ///
    /// Relative modes admit dates strictly after the computed start and not
    /// after today; the custom mode is inclusive on both ends.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::All => true,
            Period::ThisMonth | Period::ThisYear | Period::LastMonths(_) => {
                let start = match self {
                    Period::ThisMonth => today.with_day(1),
                    Period::ThisYear => today.with_day(1).and_then(|d| d.with_month(1)),
                    Period::LastMonths(n) => today.checked_sub_months(Months::new(*n)),
                    _ => unreachable!(),
                };
                match start {
                    Some(start) => date > start && date <= today,
                    None => false,
                }
            }
            Period::Custom { from, to } => {
                from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
            }
        }
    }
}

/// Weekday/weekend classification of an event's start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    All,
    Weekday,
    Weekend,
}

impl DayType {
    pub fn matches(&self, date: NaiveDate) -> bool {
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        match self {
            DayType::All => true,
            DayType::Weekday => !weekend,
            DayType::Weekend => weekend,
        }
    }
}

/// The full filter configuration for one ranking computation. All active
/// dimensions are ANDed together.
#[derive(Debug, Clone)]
pub struct ReportFilter {
    pub period: Period,
    pub day_type: DayType,
    /// `None` means no constraint; otherwise an exact division match.
    pub affiliation: Option<String>,
    /// `None` means no constraint; otherwise an exact sub-team match.
    pub group: Option<String>,
    /// `None` means no constraint; otherwise an exact product-code match.
    pub product: Option<String>,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            period: Period::All,
            day_type: DayType::All,
            affiliation: None,
            group: None,
            product: None,
        }
    }
}

impl ReportFilter {
    /// Shared parsing entry point for CLI flags and HTTP query strings.
    ///
    /// `period` accepts `all`, `this-month`, `this-year`, a bare month count
    /// (`6`, `12`), or `custom`; explicit `from`/`to` dates imply `custom`.
    /// The literal `all`, an empty string, or an absent value on
    /// `affiliation`/`group`/`product` all mean "no constraint".
    pub fn from_parts(
        period: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
        day_type: Option<&str>,
        affiliation: Option<&str>,
        group: Option<&str>,
        product: Option<&str>,
    ) -> Result<Self, String> {
        let from = parse_bound(from, "from")?;
        let to = parse_bound(to, "to")?;

        let period = match period.map(str::trim) {
            None | Some("") => {
                if from.is_some() || to.is_some() {
                    Period::Custom { from, to }
                } else {
                    Period::All
                }
            }
            Some("all") => Period::All,
            Some("this-month") => Period::ThisMonth,
            Some("this-year") => Period::ThisYear,
            Some("custom") => Period::Custom { from, to },
            Some(other) => match other.parse::<u32>() {
                Ok(months) if months > 0 => Period::LastMonths(months),
                _ => return Err(format!("unrecognized period: {other:?}")),
            },
        };

        let day_type = match day_type.map(str::trim) {
            None | Some("") | Some("all") => DayType::All,
            Some("weekday") => DayType::Weekday,
            Some("weekend") => DayType::Weekend,
            Some(other) => return Err(format!("unrecognized day type: {other:?}")),
        };

        Ok(Self {
            period,
            day_type,
            affiliation: parse_selector(affiliation),
            group: parse_selector(group),
            product: parse_selector(product),
        })
    }
}

fn parse_bound(value: Option<&str>, label: &str) -> Result<Option<NaiveDate>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, ISO_DATE)
            .map(Some)
            .map_err(|_| format!("{label} is not a valid date: {text:?}")),
    }
}

fn parse_selector(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(text) => Some(text.to_string()),
    }
}

/// One row of the ranked output: an employee and their attendance count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub name: String,
    pub affiliation: String,
    pub group: String,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn this_month_excludes_the_first_and_the_future() {
        let today = d("2025-03-15");
        assert!(!Period::ThisMonth.contains(d("2025-03-01"), today));
        assert!(Period::ThisMonth.contains(d("2025-03-02"), today));
        assert!(Period::ThisMonth.contains(d("2025-03-15"), today));
        assert!(!Period::ThisMonth.contains(d("2025-03-16"), today));
        assert!(!Period::ThisMonth.contains(d("2025-02-28"), today));
    }

    #[test]
    fn this_year_starts_after_january_first() {
        let today = d("2025-03-15");
        assert!(!Period::ThisYear.contains(d("2025-01-01"), today));
        assert!(Period::ThisYear.contains(d("2025-01-02"), today));
        assert!(!Period::ThisYear.contains(d("2024-12-31"), today));
    }

    #[test]
    fn last_months_window_is_relative_to_today() {
        let today = d("2025-03-15");
        let period = Period::LastMonths(6);
        assert!(!period.contains(d("2024-09-15"), today));
        assert!(period.contains(d("2024-09-16"), today));
        assert!(period.contains(d("2025-03-15"), today));
        assert!(!period.contains(d("2025-04-01"), today));
    }

    #[test]
    fn custom_range_is_inclusive_on_both_ends() {
        let today = d("2025-06-01");
        let period = Period::Custom {
            from: Some(d("2025-03-01")),
            to: Some(d("2025-03-31")),
        };
        assert!(period.contains(d("2025-03-01"), today));
        assert!(period.contains(d("2025-03-31"), today));
        assert!(!period.contains(d("2025-02-28"), today));
        assert!(!period.contains(d("2025-04-01"), today));

        let open_ended = Period::Custom {
            from: Some(d("2025-03-01")),
            to: None,
        };
        assert!(open_ended.contains(d("2099-01-01"), today));
    }

    #[test]
    fn day_type_classifies_weekends() {
        // 2025-03-08 is a Saturday.
        assert!(DayType::Weekend.matches(d("2025-03-08")));
        assert!(!DayType::Weekday.matches(d("2025-03-08")));
        assert!(DayType::Weekday.matches(d("2025-03-10")));
        assert!(DayType::All.matches(d("2025-03-08")));
    }

    #[test]
    fn from_parts_parses_every_period_form() {
        let f = ReportFilter::from_parts(Some("this-month"), None, None, None, None, None, None)
            .unwrap();
        assert_eq!(f.period, Period::ThisMonth);

        let f = ReportFilter::from_parts(Some("6"), None, None, None, None, None, None).unwrap();
        assert_eq!(f.period, Period::LastMonths(6));

        let f = ReportFilter::from_parts(None, Some("2025-01-01"), None, None, None, None, None)
            .unwrap();
        assert_eq!(
            f.period,
            Period::Custom {
                from: Some(d("2025-01-01")),
                to: None
            }
        );

        let f = ReportFilter::from_parts(None, None, None, None, None, None, None).unwrap();
        assert_eq!(f.period, Period::All);

        assert!(ReportFilter::from_parts(Some("fortnight"), None, None, None, None, None, None)
            .is_err());
        assert!(
            ReportFilter::from_parts(Some("custom"), Some("03/01"), None, None, None, None, None)
                .is_err()
        );
    }

    #[test]
    fn from_parts_treats_all_and_empty_as_no_constraint() {
        let f = ReportFilter::from_parts(
            None,
            None,
            None,
            Some("all"),
            Some("all"),
            Some(""),
            Some("EGL"),
        )
        .unwrap();
        assert_eq!(f.day_type, DayType::All);
        assert_eq!(f.affiliation, None);
        assert_eq!(f.group, None);
        assert_eq!(f.product.as_deref(), Some("EGL"));
    }
}
