// File: src/store.rs
use crate::dates::DateRange;
use crate::errors::{LoadError, ParseWarning};
use crate::facets::{self, FacetSet};
use crate::filter::{DateBound, FilterKey, FilterState, FilterValue};
use crate::loader::{LoadOutcome, Loader, Source};
use crate::model::{ColumnMap, Record};
use crate::stats::StatusSummary;
use std::fmt;
use std::sync::Arc;

/// Emitted to subscribers after every mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    DatasetReplaced { records: usize },
    FiltersChanged,
    FiltersApplied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

/// Owns exactly one dataset and the filter state applied to it.
pub struct LeadStore {
    records: Arc<[Record]>,
    filters: FilterState,
    columns: ColumnMap,
    last_warnings: Vec<ParseWarning>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for LeadStore {
    fn default() -> Self {
        Self::with_columns(ColumnMap::default())
    }
}

impl fmt::Debug for LeadStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadStore")
            .field("records", &self.records.len())
            .field("filters", &self.filters)
            .field("columns", &self.columns)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl LeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: ColumnMap) -> Self {
        Self {
            records: Arc::from(Vec::new()),
            filters: FilterState::default(),
            columns,
            last_warnings: Vec::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // --- Observers ---

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&self, event: StoreEvent) {
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }

    fn filters_changed(&self) {
        self.notify(StoreEvent::FiltersChanged);
    }

    // --- Dataset ---

    /// Fetches and parses through `loader`, then swaps the dataset in one step.
    /// On error the current dataset stays as it was.
    pub async fn load(
        &mut self,
        loader: &Loader,
        source: &Source,
    ) -> Result<Arc<[Record]>, LoadError> {
        let outcome = loader.load(source).await?;
        Ok(self.apply_outcome(outcome))
    }

    /// Installs a finished load. Splitting this from `load` lets a shared store be
    /// locked only for the swap, not for the fetch.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) -> Arc<[Record]> {
        self.last_warnings = outcome.warnings;
        self.replace_dataset(outcome.records)
    }

    pub fn replace_dataset(&mut self, records: Vec<Record>) -> Arc<[Record]> {
        self.records = Arc::from(records);
        self.notify(StoreEvent::DatasetReplaced {
            records: self.records.len(),
        });
        Arc::clone(&self.records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn dataset(&self) -> Arc<[Record]> {
        Arc::clone(&self.records)
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn last_warnings(&self) -> &[ParseWarning] {
        &self.last_warnings
    }

    // --- Filter setters ---

    /// Sets a flat filter by name (`searchText`, `user`, `status`, `tags`, `dateRange`).
    /// Unknown names are logged and ignored.
    pub fn set_filter(&mut self, name: &str, value: FilterValue) {
        if self.filters.set_by_name(name, value) {
            self.filters_changed();
        }
    }

    pub fn set_filter_key(&mut self, key: FilterKey, value: FilterValue) {
        if self.filters.set(key, value) {
            self.filters_changed();
        }
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.set_filter_key(FilterKey::SearchText, FilterValue::from(text));
    }

    pub fn set_date_range(&mut self, start: impl Into<DateBound>, end: impl Into<DateBound>) {
        self.filters.set_date_range(start.into(), end.into());
        self.filters_changed();
    }

    pub fn set_date_range_period(&mut self, period: &str) {
        self.filters.set_date_range_period(period);
        self.filters_changed();
    }

    pub fn select_user(&mut self, user: Option<&str>) {
        self.filters.select_user(user);
        self.filters_changed();
    }

    pub fn select_tag(&mut self, tag: Option<&str>) {
        self.filters.select_tag(tag);
        self.filters_changed();
    }

    pub fn select_group(&mut self, group: Option<&str>) {
        self.filters.select_group(group);
        self.filters_changed();
    }

    pub fn select_origin(&mut self, origin: Option<&str>) {
        self.filters.select_origin(origin);
        self.filters_changed();
    }

    /// Flat filters only; group and origin stay selected.
    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.filters_changed();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.filters_changed();
    }

    /// The view is computed on read; this only tells subscribers the UI committed a selection.
    pub fn apply_filters(&self) {
        log::debug!("Filters applied: {:?}", self.filters);
        self.notify(StoreEvent::FiltersApplied);
    }

    // --- Filter getters ---

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn date_range(&self) -> DateRange {
        self.filters.date_range
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.filters.selected_group.as_deref()
    }

    pub fn selected_origin(&self) -> Option<&str> {
        self.filters.selected_origin.as_deref()
    }

    pub fn selected_user(&self) -> Option<&str> {
        self.filters.user.as_deref()
    }

    pub fn selected_tag(&self) -> Option<&str> {
        self.filters.selected_tag()
    }

    // --- Read/Filter Logic ---

    /// Records matching every active filter clause, recomputed on each call.
    pub fn filtered_view(&self) -> Vec<&Record> {
        let needle = self.filters.search_text.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.matches_with_needle(&self.filters, &needle, &self.columns))
            .collect()
    }

    pub fn unique_users(&self) -> Vec<String> {
        facets::unique_users(&self.records, &self.columns)
    }

    pub fn unique_statuses(&self) -> Vec<String> {
        facets::unique_statuses(&self.records, &self.columns)
    }

    pub fn unique_tags(&self) -> Vec<String> {
        facets::unique_tags(&self.records)
    }

    pub fn groups(&self) -> Vec<String> {
        facets::groups(&self.records, &self.columns)
    }

    /// Scoped to the selected group when there is one.
    pub fn origins(&self) -> Vec<String> {
        facets::origins(&self.records, &self.columns, self.selected_group())
    }

    pub fn facets(&self) -> FacetSet {
        FacetSet::collect(&self.records, &self.columns, self.selected_group())
    }

    pub fn status_summary(&self) -> StatusSummary {
        StatusSummary::from_records(self.filtered_view(), &self.columns)
    }
}

/// Store shared between tasks. Loads should fetch outside the lock and only
/// take it for `apply_outcome`.
pub type SharedStore = Arc<tokio::sync::RwLock<LeadStore>>;
