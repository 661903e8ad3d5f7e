// File: ./src/stats.rs
// Aggregates fed to the dashboard charts.
use crate::model::{ColumnMap, Record};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

const OPEN: &[&str] = &["Aberto"];
const WON: &[&str] = &["Ganho", "WON"];
const LOST: &[&str] = &["Perdido", "LOST"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub open: usize,
    pub won: usize,
    pub lost: usize,
}

impl StatusSummary {
    /// Statuses outside open/won/lost only count towards `total`.
    pub fn from_records<'a, I>(records: I, columns: &ColumnMap) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut summary = Self::default();
        for record in records {
            summary.total += 1;
            let Some(status) = record.text(&columns.status) else {
                continue;
            };
            let status: &str = &status;
            if OPEN.contains(&status) {
                summary.open += 1;
            } else if WON.contains(&status) {
                summary.won += 1;
            } else if LOST.contains(&status) {
                summary.lost += 1;
            }
        }
        summary
    }
}

/// Records per calendar day, ascending. Undated records are skipped.
pub fn group_by_day<'a, I>(records: I) -> Vec<(NaiveDate, usize)>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for at in records.into_iter().filter_map(|r| r.parsed_date) {
        *days.entry(at.date()).or_insert(0) += 1;
    }
    days.into_iter().collect()
}
