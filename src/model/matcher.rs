// File: ./src/model/matcher.rs
// Predicate deciding whether a record belongs to the filtered view.
//
// Clauses are conjunctive and evaluated independently:
//   search text  -> untrimmed substring of any search column (case-insensitive)
//   user/status  -> exact equality
//   tags         -> at least one selected tag present (OR)
//   date range   -> parsed date within [start, end]; undated records drop out
//   group/origin -> exact equality, each on its own
use crate::filter::FilterState;
use crate::model::columns::ColumnMap;
use crate::model::record::Record;

impl Record {
    /// `needle` must already be lowercased.
    pub fn matches_search_text(&self, needle: &str, columns: &ColumnMap) -> bool {
        columns.search_columns().iter().any(|column| {
            self.text(column)
                .is_some_and(|value| value.to_lowercase().contains(needle))
        })
    }

    pub fn matches_filter(&self, filter: &FilterState, columns: &ColumnMap) -> bool {
        let needle = filter.search_text.to_lowercase();
        self.matches_with_needle(filter, &needle, columns)
    }

    /// Same as `matches_filter` with the search text prepared once by the caller.
    /// Whitespace only decides whether search is active; the needle keeps it.
    pub(crate) fn matches_with_needle(
        &self,
        filter: &FilterState,
        needle: &str,
        columns: &ColumnMap,
    ) -> bool {
        if !filter.search_text.trim().is_empty() && !self.matches_search_text(needle, columns) {
            return false;
        }

        if let Some(user) = &filter.user
            && !self.field_equals(&columns.user, user)
        {
            return false;
        }

        if let Some(status) = &filter.status
            && !self.field_equals(&columns.status, status)
        {
            return false;
        }

        if !filter.tags.is_empty() && !filter.tags.iter().any(|tag| self.has_tag(tag)) {
            return false;
        }

        if filter.date_range.is_active() {
            match self.parsed_date {
                Some(at) if filter.date_range.contains(at) => {}
                _ => return false,
            }
        }

        if let Some(group) = &filter.selected_group
            && !self.field_equals(&columns.group, group)
        {
            return false;
        }

        if let Some(origin) = &filter.selected_origin
            && !self.field_equals(&columns.origin, origin)
        {
            return false;
        }

        true
    }
}
