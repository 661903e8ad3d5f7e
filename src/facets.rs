// File: ./src/facets.rs
// Distinct values per filterable dimension, always taken from the unfiltered dataset.
use crate::model::{ColumnMap, Record};
use serde::Serialize;
use std::collections::BTreeSet;

fn distinct_column<'a, I>(records: I, column: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let values: BTreeSet<String> = records
        .into_iter()
        .filter_map(|r| r.text(column).map(|v| v.into_owned()))
        .collect();
    values.into_iter().collect()
}

/// Reads the same column as the user filter (`user_name` by default).
/// The original export tool listed `email` here instead.
pub fn unique_users(records: &[Record], columns: &ColumnMap) -> Vec<String> {
    distinct_column(records, &columns.user)
}

pub fn unique_statuses(records: &[Record], columns: &ColumnMap) -> Vec<String> {
    distinct_column(records, &columns.status)
}

pub fn unique_tags(records: &[Record]) -> Vec<String> {
    let tags: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.tags.iter().map(String::as_str))
        .collect();
    tags.into_iter().map(str::to_string).collect()
}

pub fn groups(records: &[Record], columns: &ColumnMap) -> Vec<String> {
    distinct_column(records, &columns.group)
}

/// Origins under `group`.
pub fn origins_for_group(records: &[Record], columns: &ColumnMap, group: &str) -> Vec<String> {
    distinct_column(
        records.iter().filter(|r| r.field_equals(&columns.group, group)),
        &columns.origin,
    )
}

/// Cascading origin list: scoped to the selected group when there is one.
pub fn origins(records: &[Record], columns: &ColumnMap, selected_group: Option<&str>) -> Vec<String> {
    match selected_group {
        Some(group) => origins_for_group(records, columns, group),
        None => distinct_column(records, &columns.origin),
    }
}

/// Narrows by group and/or origin only, ignoring every other filter.
pub fn filter_by_group_origin<'a>(
    records: &'a [Record],
    columns: &ColumnMap,
    group: Option<&str>,
    origin: Option<&str>,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| group.is_none_or(|g| r.field_equals(&columns.group, g)))
        .filter(|r| origin.is_none_or(|o| r.field_equals(&columns.origin, o)))
        .collect()
}

/// All facets at once, for populating every selector in one pass of the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacetSet {
    pub users: Vec<String>,
    pub statuses: Vec<String>,
    pub tags: Vec<String>,
    pub groups: Vec<String>,
    pub origins: Vec<String>,
}

impl FacetSet {
    pub fn collect(records: &[Record], columns: &ColumnMap, selected_group: Option<&str>) -> Self {
        Self {
            users: unique_users(records, columns),
            statuses: unique_statuses(records, columns),
            tags: unique_tags(records),
            groups: groups(records, columns),
            origins: origins(records, columns, selected_group),
        }
    }
}
