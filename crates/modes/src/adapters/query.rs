//! Query mode adapter

use std::collections::BTreeMap;

use glance_query::{build_compare_date_range, build_query};

use crate::adapter::{BuiltRequest, ModeAdapter, Validation};
use crate::adapters::log_mismatch;
use crate::chart::{ActiveView, ChartConfig, ChartType};
use crate::config::{AnalysisConfig, ConfigPayload, QueryPayload, CONFIG_VERSION};
use crate::model::{AnalysisState, AnalysisType, ModeState, QueryModeState, QueryTabs};

/// Adapter for ad hoc / multi-query mode
pub struct QueryAdapter;

impl ModeAdapter for QueryAdapter {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Query
    }

    fn extract_state(&self, state: &AnalysisState) -> ModeState {
        ModeState::Query(state.query.clone())
    }

    fn apply_state(&self, state: &mut AnalysisState, mode: ModeState) {
        match mode {
            ModeState::Query(tabs) => state.query = tabs,
            other => log_mismatch(self.analysis_type(), &other),
        }
    }

    fn validate(&self, mode: &ModeState) -> Validation {
        let ModeState::Query(tabs) = mode else {
            log_mismatch(self.analysis_type(), mode);
            return Validation::from_errors(vec!["not a query configuration".to_string()]);
        };

        let mut errors = Vec::new();
        for (index, tab) in tabs.query_states.iter().enumerate() {
            if tab.is_empty() {
                if tabs.query_states.len() == 1 {
                    errors.push("add at least one metric, breakdown, or filter".to_string());
                } else {
                    errors.push(format!(
                        "query {} needs at least one metric, breakdown, or filter",
                        index + 1
                    ));
                }
            }
        }
        Validation::from_errors(errors)
    }

    fn build_request(&self, mode: &ModeState) -> Option<BuiltRequest> {
        let ModeState::Query(tabs) = mode else {
            log_mismatch(self.analysis_type(), mode);
            return None;
        };

        let requests = tabs
            .query_states
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                let breakdowns = tabs.effective_breakdowns(index);
                let mut request = build_query(&tab.metrics, breakdowns, &tab.filters, &tab.order);

                // Attach comparison windows to time dimensions that ask for them
                if let Some(time_dimensions) = request.time_dimensions.as_mut() {
                    for breakdown in breakdowns
                        .iter()
                        .filter(|b| b.is_time_dimension && b.enable_comparison)
                    {
                        let Some(spans) =
                            build_compare_date_range(&breakdown.field, &tab.filters)
                        else {
                            continue;
                        };
                        if let Some(entry) = time_dimensions
                            .iter_mut()
                            .find(|t| t.dimension == breakdown.field)
                        {
                            entry.compare_date_range =
                                Some(spans.iter().map(|s| s.to_strings()).collect());
                        }
                    }
                }
                request
            })
            .collect();

        Some(BuiltRequest::Query {
            requests,
            merge_keys: tabs.merge_keys(),
            strategy: tabs.merge_strategy,
        })
    }

    fn save(
        &self,
        mode: &ModeState,
        charts: &BTreeMap<AnalysisType, ChartConfig>,
        active_view: ActiveView,
    ) -> AnalysisConfig {
        let tabs = match mode {
            ModeState::Query(tabs) => tabs.clone(),
            other => {
                log_mismatch(self.analysis_type(), other);
                QueryTabs::default()
            }
        };
        AnalysisConfig {
            version: CONFIG_VERSION,
            payload: ConfigPayload::Query(QueryPayload {
                merge_keys: tabs.merge_keys(),
                query_states: tabs.query_states,
                active_query_index: tabs.active_query_index,
                merge_strategy: tabs.merge_strategy,
            }),
            charts: charts.clone(),
            active_view,
        }
    }

    fn load(&self, config: &AnalysisConfig) -> Option<ModeState> {
        if !self.can_load(config) {
            return None;
        }
        let ConfigPayload::Query(payload) = &config.payload else {
            return None;
        };

        let mut tabs = QueryTabs {
            query_states: payload.query_states.clone(),
            active_query_index: payload.active_query_index,
            merge_strategy: payload.merge_strategy,
            user_selected_chart: false,
        };
        if tabs.query_states.is_empty() {
            tabs.query_states.push(QueryModeState::default());
        }
        tabs.active_query_index = tabs.active_query_index.min(tabs.query_states.len() - 1);
        Some(ModeState::Query(tabs))
    }

    fn default_chart_config(&self) -> ChartConfig {
        ChartConfig::new(ChartType::Line)
    }
}
