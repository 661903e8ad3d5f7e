// File: ./src/dates.rs
// Relative period resolution, tolerant date parsing and display formatting.
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Named relative periods offered by the date selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, Display,
)]
pub enum Period {
    #[strum(to_string = "today")]
    #[serde(rename = "today")]
    Today,
    #[strum(to_string = "yesterday")]
    #[serde(rename = "yesterday")]
    Yesterday,
    #[strum(to_string = "last7days")]
    #[serde(rename = "last7days")]
    Last7Days,
    #[strum(to_string = "thisWeek")]
    #[serde(rename = "thisWeek")]
    ThisWeek,
    #[strum(to_string = "lastWeek")]
    #[serde(rename = "lastWeek")]
    LastWeek,
    #[strum(to_string = "thisMonth")]
    #[serde(rename = "thisMonth")]
    ThisMonth,
    #[strum(to_string = "lastMonth")]
    #[serde(rename = "lastMonth")]
    LastMonth,
    #[strum(to_string = "thisYear")]
    #[serde(rename = "thisYear")]
    ThisYear,
}

/// Inclusive date-time window. Either bound may be absent; the range only
/// constrains anything once both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Both bounds present.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.start?, self.end?))
    }

    pub fn is_active(&self) -> bool {
        self.bounds().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Literal comparison against the stored bounds; a reversed range contains nothing.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        match self.bounds() {
            Some((start, end)) => at >= start && at <= end,
            None => true,
        }
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

impl Period {
    /// Concrete window for this period with `today` as the anchor day.
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        let since_sunday = i64::from(today.weekday().num_days_from_sunday());

        let (start, end) = match self {
            Period::Today => (today, today),
            Period::Yesterday => {
                let day = today - Duration::days(1);
                (day, day)
            }
            Period::Last7Days => (today - Duration::days(6), today),
            Period::ThisWeek => (today - Duration::days(since_sunday), today),
            Period::LastWeek => (
                today - Duration::days(since_sunday + 7),
                today - Duration::days(since_sunday + 1),
            ),
            Period::ThisMonth => (first_of_month(today), today),
            Period::LastMonth => {
                let last_of_previous = first_of_month(today) - Duration::days(1);
                (first_of_month(last_of_previous), last_of_previous)
            }
            Period::ThisYear => (first_of_year(today), today),
        };

        DateRange::new(Some(start_of_day(start)), Some(end_of_day(end)))
    }
}

/// Resolves a period name against the current local day.
/// Unknown names yield `None`, which callers treat as "clear the date filter".
pub fn resolve_period(name: &str) -> Option<DateRange> {
    resolve_period_on(name, Local::now().date_naive())
}

pub fn resolve_period_on(name: &str, today: NaiveDate) -> Option<DateRange> {
    let period = Period::from_str(name.trim()).ok()?;
    Some(period.resolve(today))
}

// --- Parsing ---

fn parse_dmy(value: &str) -> Option<NaiveDate> {
    let mut parts = value.split('/');
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// `day/month/year` with an optional `HH:MM[:SS]` time after whitespace.
pub fn parse_day_first(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    let (date_part, time_part) = match value.split_once(char::is_whitespace) {
        Some((d, t)) => (d, Some(t.trim())),
        None => (value, None),
    };

    let date = parse_dmy(date_part)?;
    match time_part {
        Some(t) if !t.is_empty() => Some(date.and_time(parse_clock(t)?)),
        _ => Some(start_of_day(date)),
    }
}

/// Strict `day/month/year`, no time component.
pub fn parse_day_first_date(value: &str) -> Option<NaiveDate> {
    parse_dmy(value.trim())
}

const GENERIC_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Best-effort parsing of ISO-like timestamps. Offsets are converted to local time.
pub fn parse_generic(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in GENERIC_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .ok()
        .map(start_of_day)
}

/// Day-first first, then the generic formats.
pub fn parse_flexible(value: &str) -> Option<NaiveDateTime> {
    parse_day_first(value).or_else(|| parse_generic(value))
}

// --- Formatting ---

/// `dd/mm/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy HH:MM`
pub fn format_date_time(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// `yyyy-mm-dd`
pub fn to_iso_date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
