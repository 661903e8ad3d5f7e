// File: ./src/filter.rs
// Filter state and its setters. Setters never fail: misuse is logged and ignored,
// invalid date bounds are stored as absent.
use crate::dates::{self, DateRange};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Flat filter fields addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
pub enum FilterKey {
    #[strum(to_string = "searchText")]
    SearchText,
    #[strum(to_string = "user")]
    User,
    #[strum(to_string = "status")]
    Status,
    #[strum(to_string = "tags")]
    Tags,
    #[strum(to_string = "dateRange")]
    DateRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Tags(Vec<String>),
    Range(DateRange),
    Clear,
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<Option<&str>> for FilterValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(FilterValue::Clear, FilterValue::from)
    }
}

/// One bound handed to `set_date_range`.
#[derive(Debug, Clone, PartialEq)]
pub enum DateBound {
    At(NaiveDateTime),
    Day(NaiveDate),
    Text(String),
    Missing,
}

impl DateBound {
    /// `Day` resolves to midnight. Text goes through the same rules as record dates.
    pub fn resolve(&self) -> Option<NaiveDateTime> {
        match self {
            DateBound::At(at) => Some(*at),
            DateBound::Day(day) => Some(dates::start_of_day(*day)),
            DateBound::Text(text) => dates::parse_flexible(text),
            DateBound::Missing => None,
        }
    }
}

impl From<NaiveDateTime> for DateBound {
    fn from(value: NaiveDateTime) -> Self {
        DateBound::At(value)
    }
}

impl From<NaiveDate> for DateBound {
    fn from(value: NaiveDate) -> Self {
        DateBound::Day(value)
    }
}

impl From<&str> for DateBound {
    fn from(value: &str) -> Self {
        DateBound::Text(value.to_string())
    }
}

impl<T: Into<DateBound>> From<Option<T>> for DateBound {
    fn from(value: Option<T>) -> Self {
        value.map_or(DateBound::Missing, Into::into)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterState {
    pub search_text: String,
    pub user: Option<String>,
    pub status: Option<String>,
    pub tags: Vec<String>,
    pub date_range: DateRange,
    pub selected_group: Option<String>,
    pub selected_origin: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a flat filter by its external name. Unknown names are logged and ignored.
    pub fn set_by_name(&mut self, name: &str, value: FilterValue) -> bool {
        match FilterKey::from_str(name) {
            Ok(key) => self.set(key, value),
            Err(_) => {
                log::warn!("Filter '{}' does not exist", name);
                false
            }
        }
    }

    /// Returns whether the value was applied.
    pub fn set(&mut self, key: FilterKey, value: FilterValue) -> bool {
        match (key, value) {
            (FilterKey::SearchText, FilterValue::Text(text)) => self.search_text = text,
            (FilterKey::SearchText, FilterValue::Clear) => self.search_text.clear(),
            (FilterKey::User, FilterValue::Text(user)) => self.user = non_empty(user),
            (FilterKey::User, FilterValue::Clear) => self.user = None,
            (FilterKey::Status, FilterValue::Text(status)) => self.status = non_empty(status),
            (FilterKey::Status, FilterValue::Clear) => self.status = None,
            (FilterKey::Tags, FilterValue::Tags(tags)) => {
                self.tags = tags.into_iter().filter(|t| !t.is_empty()).collect();
            }
            (FilterKey::Tags, FilterValue::Text(tag)) => self.select_tag(Some(&tag)),
            (FilterKey::Tags, FilterValue::Clear) => self.tags.clear(),
            (FilterKey::DateRange, FilterValue::Range(range)) => self.date_range = range,
            (FilterKey::DateRange, FilterValue::Clear) => self.date_range = DateRange::default(),
            (key, value) => {
                log::warn!("Ignoring value {:?} for filter '{}'", value, key);
                return false;
            }
        }
        true
    }

    /// Each bound is validated on its own; an invalid one is stored as absent.
    /// Bounds are kept literally, so a reversed range matches nothing.
    pub fn set_date_range(&mut self, start: DateBound, end: DateBound) {
        let range = DateRange::new(start.resolve(), end.resolve());
        if range.start.is_none() && start != DateBound::Missing {
            log::warn!("Invalid start date {:?}, treating as absent", start);
        }
        if range.end.is_none() && end != DateBound::Missing {
            log::warn!("Invalid end date {:?}, treating as absent", end);
        }
        self.date_range = range;
    }

    /// Unknown period names clear the range.
    pub fn set_date_range_period(&mut self, period: &str) {
        self.date_range = dates::resolve_period(period).unwrap_or_default();
    }

    pub fn select_user(&mut self, user: Option<&str>) {
        self.user = user.map(str::to_string).and_then(non_empty);
    }

    /// Single-tag selection: replaces the whole tag list.
    pub fn select_tag(&mut self, tag: Option<&str>) {
        self.tags = match tag {
            Some(tag) if !tag.is_empty() => vec![tag.to_string()],
            _ => Vec::new(),
        };
    }

    pub fn selected_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    /// Does not touch the origin selection, even if it belongs to another group.
    pub fn select_group(&mut self, group: Option<&str>) {
        self.selected_group = group.map(str::to_string).and_then(non_empty);
    }

    pub fn select_origin(&mut self, origin: Option<&str>) {
        self.selected_origin = origin.map(str::to_string).and_then(non_empty);
    }

    /// Restores the flat fields; group and origin survive.
    pub fn reset(&mut self) {
        *self = Self {
            selected_group: self.selected_group.take(),
            selected_origin: self.selected_origin.take(),
            ..Self::default()
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
