//! Query mode state
//!
//! Query mode holds an ordered array of query tabs plus the strategy for
//! combining their results at execution time.

use serde::{Deserialize, Serialize};

use glance_query::{
    find_date_condition, BreakdownSelection, DateRange, Filter, MetricSelection, SortDirection,
};

/// Default range for the date filter auto-added when comparison is enabled
const DEFAULT_COMPARISON_RANGE: &str = "30d";

/// One query tab: a flat selection of metrics, breakdowns, and filters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryModeState {
    #[serde(default)]
    pub metrics: Vec<MetricSelection>,
    #[serde(default)]
    pub breakdowns: Vec<BreakdownSelection>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<(String, SortDirection)>,
    /// Counter for metric label assignment; survives removals so labels
    /// never repeat within a tab
    #[serde(default)]
    pub next_label: u32,
    #[serde(default, skip_serializing_if = "ValidationStatus::is_unknown")]
    pub validation_status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl QueryModeState {
    /// Add a metric; returns the new selection's id
    pub fn add_metric(&mut self, field: impl Into<String>) -> String {
        let metric = MetricSelection::new(field, self.next_label);
        self.next_label += 1;
        let id = metric.id.clone();
        self.metrics.push(metric);
        id
    }

    /// Remove a metric by id
    pub fn remove_metric(&mut self, id: &str) {
        self.metrics.retain(|m| m.id != id);
    }

    /// Add a breakdown; returns the new selection's id
    pub fn add_breakdown(&mut self, breakdown: BreakdownSelection) -> String {
        let id = breakdown.id.clone();
        self.breakdowns.push(breakdown);
        id
    }

    /// Remove a breakdown by id
    pub fn remove_breakdown(&mut self, id: &str) {
        self.breakdowns.retain(|b| b.id != id);
    }

    /// Enable or disable period comparison on one breakdown
    ///
    /// At most one breakdown may have comparison enabled: enabling it here
    /// clears it everywhere else. Enabling also auto-adds an `inDateRange`
    /// filter on the breakdown's field if none exists yet, so the comparison
    /// has a period to work from; toggling repeatedly never duplicates it.
    pub fn set_comparison(&mut self, id: &str, enabled: bool) {
        let Some(field) = self
            .breakdowns
            .iter()
            .find(|b| b.id == id && b.is_time_dimension)
            .map(|b| b.field.clone())
        else {
            return;
        };

        for breakdown in &mut self.breakdowns {
            breakdown.enable_comparison = enabled && breakdown.id == id;
        }

        if enabled && find_date_condition(&field, &self.filters).is_none() {
            self.filters.push(Filter::in_date_range(
                field,
                DateRange::preset(DEFAULT_COMPARISON_RANGE),
            ));
        }
    }

    /// Whether nothing has been selected yet
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.breakdowns.is_empty() && self.filters.is_empty()
    }
}

/// Cached validation state for a query tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

impl ValidationStatus {
    pub fn is_unknown(&self) -> bool {
        *self == Self::Unknown
    }
}

/// How multiple query tabs combine at execution time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Each tab runs independently; results are concatenated by the caller
    #[default]
    Concat,
    /// Tabs 2..N reuse tab 1's breakdowns and join on them
    Merge,
    /// Tabs are ordered steps bound by a shared key (legacy; superseded by
    /// the dedicated funnel mode)
    Funnel,
}

/// The full query-mode state: ordered tabs plus combination strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTabs {
    pub query_states: Vec<QueryModeState>,
    #[serde(default)]
    pub active_query_index: usize,
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    /// Set when the user picks a chart manually; suppresses strategy-driven
    /// chart switching until the analysis type changes
    #[serde(skip)]
    pub user_selected_chart: bool,
}

impl Default for QueryTabs {
    fn default() -> Self {
        Self {
            query_states: vec![QueryModeState::default()],
            active_query_index: 0,
            merge_strategy: MergeStrategy::default(),
            user_selected_chart: false,
        }
    }
}

impl QueryTabs {
    /// The currently active tab
    pub fn active_state(&self) -> &QueryModeState {
        let index = self.active_query_index.min(self.query_states.len() - 1);
        &self.query_states[index]
    }

    /// The currently active tab, mutable
    pub fn active_state_mut(&mut self) -> &mut QueryModeState {
        let index = self.active_query_index.min(self.query_states.len() - 1);
        &mut self.query_states[index]
    }

    /// Append a new empty tab and return its index
    pub fn add_tab(&mut self) -> usize {
        self.query_states.push(QueryModeState::default());
        self.query_states.len() - 1
    }

    /// Remove a tab; the last tab cannot be removed
    pub fn remove_tab(&mut self, index: usize) {
        if self.query_states.len() > 1 && index < self.query_states.len() {
            self.query_states.remove(index);
            self.active_query_index = self.active_query_index.min(self.query_states.len() - 1);
        }
    }

    /// The breakdowns a tab is effectively grouped by
    ///
    /// Under the merge strategy, tab 1's breakdowns are locked across all
    /// tabs: this returns tab 1's list for every index above zero, even if
    /// the tab's own stored breakdowns differ.
    pub fn effective_breakdowns(&self, index: usize) -> &[BreakdownSelection] {
        if self.merge_strategy == MergeStrategy::Merge && index > 0 {
            &self.query_states[0].breakdowns
        } else {
            let index = index.min(self.query_states.len() - 1);
            &self.query_states[index].breakdowns
        }
    }

    /// Join keys under the merge strategy: exactly tab 1's breakdown fields,
    /// or `None` if tab 1 has none (or another strategy is active)
    pub fn merge_keys(&self) -> Option<Vec<String>> {
        if self.merge_strategy != MergeStrategy::Merge {
            return None;
        }
        let keys: Vec<String> = self.query_states[0]
            .breakdowns
            .iter()
            .map(|b| b.field.clone())
            .collect();
        if keys.is_empty() {
            None
        } else {
            Some(keys)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_query::FilterOperator;

    #[test]
    fn test_metric_labels_assigned_in_order() {
        let mut state = QueryModeState::default();
        state.add_metric("Orders.count");
        state.add_metric("Orders.revenue");
        assert_eq!(state.metrics[0].label, "A");
        assert_eq!(state.metrics[1].label, "B");
    }

    #[test]
    fn test_metric_labels_do_not_repeat_after_removal() {
        let mut state = QueryModeState::default();
        let id = state.add_metric("Orders.count");
        state.add_metric("Orders.revenue");
        state.remove_metric(&id);
        state.add_metric("Users.count");
        assert_eq!(state.metrics[1].label, "C");
    }

    #[test]
    fn test_comparison_is_exclusive() {
        let mut state = QueryModeState::default();
        let first = state.add_breakdown(BreakdownSelection::time("Orders.createdAt"));
        let second = state.add_breakdown(BreakdownSelection::time("Orders.shippedAt"));

        state.set_comparison(&first, true);
        assert!(state.breakdowns[0].enable_comparison);

        state.set_comparison(&second, true);
        assert!(!state.breakdowns[0].enable_comparison);
        assert!(state.breakdowns[1].enable_comparison);
    }

    #[test]
    fn test_comparison_toggle_is_idempotent() {
        let mut state = QueryModeState::default();
        let id = state.add_breakdown(BreakdownSelection::time("Orders.createdAt"));

        state.set_comparison(&id, true);
        state.set_comparison(&id, false);
        assert!(!state.breakdowns[0].enable_comparison);

        // The auto-added date filter is not duplicated by a second toggle
        state.set_comparison(&id, true);
        let date_filters = state
            .filters
            .iter()
            .filter(|f| {
                matches!(f, Filter::Condition(c) if c.operator == FilterOperator::InDateRange)
            })
            .count();
        assert_eq!(date_filters, 1);
    }

    #[test]
    fn test_comparison_ignored_for_plain_breakdowns() {
        let mut state = QueryModeState::default();
        let id = state.add_breakdown(BreakdownSelection::new("Orders.status"));
        state.set_comparison(&id, true);
        assert!(!state.breakdowns[0].enable_comparison);
        assert!(state.filters.is_empty());
    }

    #[test]
    fn test_merge_locks_tab_one_breakdowns() {
        let mut tabs = QueryTabs::default();
        tabs.query_states[0].add_breakdown(BreakdownSelection::new("Orders.country"));
        tabs.query_states[0].add_breakdown(BreakdownSelection::new("Orders.status"));
        tabs.add_tab();
        tabs.query_states[1].add_breakdown(BreakdownSelection::new("Users.plan"));

        tabs.merge_strategy = MergeStrategy::Merge;
        let effective: Vec<&str> = tabs
            .effective_breakdowns(1)
            .iter()
            .map(|b| b.field.as_str())
            .collect();
        assert_eq!(effective, vec!["Orders.country", "Orders.status"]);
        assert_eq!(
            tabs.merge_keys().unwrap(),
            vec!["Orders.country".to_string(), "Orders.status".to_string()]
        );

        // Under concat each tab keeps its own breakdowns
        tabs.merge_strategy = MergeStrategy::Concat;
        assert_eq!(tabs.effective_breakdowns(1)[0].field, "Users.plan");
        assert_eq!(tabs.merge_keys(), None);
    }

    #[test]
    fn test_merge_keys_none_without_tab_one_breakdowns() {
        let mut tabs = QueryTabs::default();
        tabs.merge_strategy = MergeStrategy::Merge;
        assert_eq!(tabs.merge_keys(), None);
    }

    #[test]
    fn test_remove_tab_keeps_last_and_clamps_index() {
        let mut tabs = QueryTabs::default();
        tabs.add_tab();
        tabs.active_query_index = 1;
        tabs.remove_tab(1);
        assert_eq!(tabs.query_states.len(), 1);
        assert_eq!(tabs.active_query_index, 0);
        tabs.remove_tab(0);
        assert_eq!(tabs.query_states.len(), 1);
    }
}
