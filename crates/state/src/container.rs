//! The workspace container
//!
//! A single mutable root composed from the per-mode sub-states. One
//! synchronous mutator, many passive readers: every mutation replaces the
//! whole snapshot and then notifies subscribers, so a reader never observes
//! a half-applied change. Each mutation also writes the workspace blob to
//! storage, fire-and-forget.

use std::sync::Arc;

use glance_modes::{
    adapter_for, ActiveView, AnalysisState, AnalysisType, BuiltRequest, ChartConfig, ChartType,
    MergeStrategy, QueryModeState, QueryTabs, Validation, ValidationStatus,
};
use glance_query::{BreakdownSelection, DateRange, Filter, FunnelStep, Granularity, SortDirection, StepDefinition};

use crate::assist::Generation;
use crate::persist::{load_workspace, save_workspace};
use crate::recent::RecentFields;
use crate::storage::Storage;

/// Handle returned by [`Workspace::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&AnalysisState) + Send>;

/// The composed, mutable workspace
pub struct Workspace {
    state: AnalysisState,
    generation: Generation,
    recent: RecentFields,
    storage: Option<Arc<dyn Storage>>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscriber: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Fresh workspace without durable storage
    pub fn new() -> Self {
        Self {
            state: AnalysisState::new(),
            generation: Generation::default(),
            recent: RecentFields::new(),
            storage: None,
            subscribers: Vec::new(),
            next_subscriber: 1,
        }
    }

    /// Restore a workspace from storage (fresh defaults if nothing usable
    /// is found) and keep writing back to it on every mutation
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let state = load_workspace(storage.as_ref());
        let recent = RecentFields::load(storage.as_ref());
        Self {
            state,
            generation: Generation::default(),
            recent,
            storage: Some(storage),
            subscribers: Vec::new(),
            next_subscriber: 1,
        }
    }

    // ----- reads -------------------------------------------------------

    /// The current snapshot
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn active_type(&self) -> AnalysisType {
        self.state.active_type
    }

    pub fn query_tabs(&self) -> &QueryTabs {
        &self.state.query
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn recent_fields(&self) -> &RecentFields {
        &self.recent
    }

    /// Validate the active mode's configuration
    pub fn validate(&self) -> Validation {
        let adapter = adapter_for(self.state.active_type);
        adapter.validate(&adapter.extract_state(&self.state))
    }

    /// Build the active mode's executable request; `None` when not yet
    /// executable
    pub fn build_request(&self) -> Option<BuiltRequest> {
        let adapter = adapter_for(self.state.active_type);
        adapter.build_request(&adapter.extract_state(&self.state))
    }

    // ----- observer contract -------------------------------------------

    /// Register a callback invoked once per completed mutation with the new
    /// snapshot
    pub fn subscribe(&mut self, callback: impl Fn(&AnalysisState) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription; unknown ids are a no-op
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    fn notify(&self) {
        for (_, callback) in &self.subscribers {
            callback(&self.state);
        }
    }

    /// Write the workspace blob now; best-effort
    pub fn persist(&self) {
        if let Some(storage) = &self.storage {
            save_workspace(&self.state, storage.as_ref());
        }
    }

    /// Apply a mutation as a whole-snapshot replacement, then notify and
    /// persist
    fn mutate<R>(&mut self, f: impl FnOnce(&mut AnalysisState) -> R) -> R {
        let mut next = self.state.clone();
        let result = f(&mut next);
        self.state = next;
        self.notify();
        self.persist();
        result
    }

    fn touch_recent(&mut self, category: &str, field: &str) {
        self.recent.touch(category, field);
        if let Some(storage) = &self.storage {
            self.recent.save(storage.as_ref());
        }
    }

    // ----- mode switching ----------------------------------------------

    /// Switch the active mode. Other modes' sub-states are untouched; the
    /// target mode's chart is seeded from its adapter default if absent.
    pub fn set_analysis_type(&mut self, analysis_type: AnalysisType) {
        self.mutate(|s| {
            s.active_type = analysis_type;
            s.query.user_selected_chart = false;
            s.ensure_chart(analysis_type);
        });
    }

    /// Set the chart for the active mode; counts as a manual override
    pub fn set_chart(&mut self, chart: ChartConfig) {
        self.mutate(|s| {
            if s.active_type == AnalysisType::Query {
                s.query.user_selected_chart = true;
            }
            s.charts.insert(s.active_type, chart);
        });
    }

    /// Set the table/chart view for the active mode
    pub fn set_active_view(&mut self, view: ActiveView) {
        self.mutate(|s| {
            s.active_views.insert(s.active_type, view);
        });
    }

    // ----- query mode --------------------------------------------------

    /// Add a metric to the active query tab; returns its id
    pub fn add_metric(&mut self, field: impl Into<String>) -> String {
        let field = field.into();
        self.touch_recent("measures", &field);
        self.mutate(|s| s.query.active_state_mut().add_metric(field))
    }

    pub fn remove_metric(&mut self, id: &str) {
        self.mutate(|s| s.query.active_state_mut().remove_metric(id));
    }

    /// Add a breakdown to the active query tab; returns its id
    pub fn add_breakdown(&mut self, breakdown: BreakdownSelection) -> String {
        self.touch_recent("dimensions", &breakdown.field);
        self.mutate(|s| s.query.active_state_mut().add_breakdown(breakdown))
    }

    pub fn remove_breakdown(&mut self, id: &str) {
        self.mutate(|s| s.query.active_state_mut().remove_breakdown(id));
    }

    pub fn set_breakdown_granularity(&mut self, id: &str, granularity: Granularity) {
        self.mutate(|s| {
            if let Some(breakdown) = s
                .query
                .active_state_mut()
                .breakdowns
                .iter_mut()
                .find(|b| b.id == id)
            {
                breakdown.granularity = Some(granularity);
            }
        });
    }

    /// Enable or disable period comparison on a breakdown of the active tab
    pub fn set_breakdown_comparison(&mut self, id: &str, enabled: bool) {
        self.mutate(|s| s.query.active_state_mut().set_comparison(id, enabled));
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.mutate(|s| s.query.active_state_mut().filters.push(filter));
    }

    pub fn remove_filter(&mut self, index: usize) {
        self.mutate(|s| {
            let filters = &mut s.query.active_state_mut().filters;
            if index < filters.len() {
                filters.remove(index);
            }
        });
    }

    pub fn set_order(&mut self, order: Vec<(String, SortDirection)>) {
        self.mutate(|s| s.query.active_state_mut().order = order);
    }

    /// Append a new query tab and make it active; returns its index
    pub fn add_query_tab(&mut self) -> usize {
        self.mutate(|s| {
            let index = s.query.add_tab();
            s.query.active_query_index = index;
            index
        })
    }

    pub fn remove_query_tab(&mut self, index: usize) {
        self.mutate(|s| s.query.remove_tab(index));
    }

    pub fn set_active_query(&mut self, index: usize) {
        self.mutate(|s| {
            if index < s.query.query_states.len() {
                s.query.active_query_index = index;
            }
        });
    }

    /// Change the multi-query merge strategy
    ///
    /// Moving to or from the funnel strategy also switches the chart type
    /// between the funnel chart and the mode default, unless the user has
    /// picked a chart manually since the last mode change.
    pub fn set_merge_strategy(&mut self, strategy: MergeStrategy) {
        self.mutate(|s| {
            s.query.merge_strategy = strategy;
            if !s.query.user_selected_chart {
                let chart_type = if strategy == MergeStrategy::Funnel {
                    ChartType::Funnel
                } else {
                    adapter_for(AnalysisType::Query)
                        .default_chart_config()
                        .chart_type
                };
                s.ensure_chart(AnalysisType::Query);
                if let Some(chart) = s.charts.get_mut(&AnalysisType::Query) {
                    chart.chart_type = chart_type;
                }
            }
        });
    }

    /// Re-run validation for the active mode and cache the outcome on the
    /// active query tab
    pub fn refresh_validation(&mut self) -> Validation {
        let validation = self.validate();
        if self.state.active_type == AnalysisType::Query {
            let cached = validation.clone();
            self.mutate(move |s| {
                let tab = s.query.active_state_mut();
                tab.validation_status = if cached.is_valid {
                    ValidationStatus::Valid
                } else {
                    ValidationStatus::Invalid
                };
                tab.validation_error = cached.errors.first().cloned();
            });
        }
        validation
    }

    // ----- funnel mode -------------------------------------------------

    pub fn set_funnel_cube(&mut self, cube: impl Into<String>) {
        let cube = cube.into();
        self.mutate(|s| s.funnel.cube = Some(cube));
    }

    pub fn set_funnel_binding_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.mutate(|s| s.funnel.binding_key = Some(key));
    }

    pub fn set_funnel_time_dimension(&mut self, dimension: impl Into<String>) {
        let dimension = dimension.into();
        self.mutate(|s| s.funnel.time_dimension = Some(dimension));
    }

    pub fn set_funnel_date_range(&mut self, range: DateRange) {
        self.mutate(|s| s.funnel.date_range = Some(range));
    }

    /// Append a funnel step and make it active; returns its id
    pub fn add_funnel_step(&mut self, step: FunnelStep) -> String {
        self.mutate(|s| {
            let id = s.funnel.add_step(step);
            s.funnel.active_step_index = s.funnel.steps.len() - 1;
            id
        })
    }

    pub fn remove_funnel_step(&mut self, id: &str) {
        self.mutate(|s| s.funnel.remove_step(id));
    }

    /// Edit one funnel step in place
    pub fn update_funnel_step(&mut self, id: &str, edit: impl FnOnce(&mut FunnelStep)) {
        self.mutate(|s| {
            if let Some(step) = s.funnel.step_mut(id) {
                edit(step);
            }
        });
    }

    pub fn set_active_funnel_step(&mut self, index: usize) {
        self.mutate(|s| {
            if index < s.funnel.steps.len() {
                s.funnel.active_step_index = index;
            }
        });
    }

    // ----- flow mode ---------------------------------------------------

    pub fn set_flow_cube(&mut self, cube: impl Into<String>) {
        let cube = cube.into();
        self.mutate(|s| s.flow.cube = Some(cube));
    }

    pub fn set_flow_binding_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.mutate(|s| s.flow.binding_key = Some(key));
    }

    pub fn set_flow_time_dimension(&mut self, dimension: impl Into<String>) {
        let dimension = dimension.into();
        self.mutate(|s| s.flow.time_dimension = Some(dimension));
    }

    pub fn set_flow_date_range(&mut self, range: DateRange) {
        self.mutate(|s| s.flow.date_range = Some(range));
    }

    pub fn set_flow_starting_step(&mut self, step: StepDefinition) {
        self.mutate(|s| s.flow.starting_step = Some(step));
    }

    pub fn add_flow_filter(&mut self, filter: Filter) {
        self.mutate(|s| s.flow.filters.push(filter));
    }

    pub fn add_flow_breakdown(&mut self, field: impl Into<String>) {
        let field = field.into();
        self.touch_recent("dimensions", &field);
        self.mutate(|s| s.flow.breakdowns.push(field));
    }

    // ----- retention mode ----------------------------------------------

    pub fn set_retention_cube(&mut self, cube: impl Into<String>) {
        let cube = cube.into();
        self.mutate(|s| s.retention.cube = Some(cube));
    }

    pub fn set_retention_binding_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.mutate(|s| s.retention.binding_key = Some(key));
    }

    pub fn set_retention_time_dimension(&mut self, dimension: impl Into<String>) {
        let dimension = dimension.into();
        self.mutate(|s| s.retention.time_dimension = Some(dimension));
    }

    pub fn set_retention_date_range(&mut self, range: DateRange) {
        self.mutate(|s| s.retention.date_range = Some(range));
    }

    pub fn set_retention_periods(&mut self, periods: u32) {
        self.mutate(|s| s.retention.periods = periods);
    }

    pub fn set_retention_granularity(&mut self, granularity: Granularity) {
        self.mutate(|s| s.retention.granularity = granularity);
    }

    pub fn add_cohort_filter(&mut self, filter: Filter) {
        self.mutate(|s| s.retention.cohort_filters.push(filter));
    }

    pub fn add_activity_filter(&mut self, filter: Filter) {
        self.mutate(|s| s.retention.activity_filters.push(filter));
    }

    // ----- AI-assisted generation --------------------------------------

    /// Enter the generating phase, snapshotting the active query tab and
    /// chart so a cancel can restore them exactly
    pub fn begin_generation(&mut self) {
        let query = self.state.query.active_state().clone();
        let chart = self.state.chart(AnalysisType::Query).cloned();
        self.generation.begin(query, chart);
        self.notify();
    }

    /// Apply a generated selection to the active query tab. Ignored unless
    /// a generation is in flight.
    pub fn apply_generated(&mut self, generated: QueryModeState, chart: Option<ChartConfig>) {
        if !self.generation.is_generating() {
            return;
        }
        self.mutate(|s| {
            *s.query.active_state_mut() = generated;
            if let Some(chart) = chart {
                s.charts.insert(AnalysisType::Query, chart);
            }
        });
    }

    /// Mark the in-flight generation as succeeded; the applied state stays
    pub fn complete_generation(&mut self) {
        self.generation.complete();
        self.notify();
    }

    /// Mark the in-flight generation as failed; state stays until the host
    /// cancels or retries
    pub fn fail_generation(&mut self, message: impl Into<String>) {
        self.generation.fail(message);
        self.notify();
    }

    /// Leave the generation flow, restoring the pre-generation snapshot if
    /// one is held
    pub fn cancel_generation(&mut self) {
        match self.generation.cancel() {
            Some(snapshot) => self.mutate(|s| {
                *s.query.active_state_mut() = snapshot.query;
                match snapshot.chart {
                    Some(chart) => {
                        s.charts.insert(AnalysisType::Query, chart);
                    }
                    None => {
                        s.charts.remove(&AnalysisType::Query);
                    }
                }
            }),
            None => self.notify(),
        }
    }
}
