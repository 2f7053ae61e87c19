//! Flow mode adapter

use std::collections::BTreeMap;

use glance_query::build_flow_query;

use crate::adapter::{BuiltRequest, ModeAdapter, Validation};
use crate::adapters::log_mismatch;
use crate::chart::{ActiveView, ChartConfig, ChartType};
use crate::config::{AnalysisConfig, ConfigPayload, FlowPayload, CONFIG_VERSION};
use crate::model::{AnalysisState, AnalysisType, FlowModeState, ModeState};

/// Adapter for flow mode
pub struct FlowAdapter;

impl ModeAdapter for FlowAdapter {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Flow
    }

    fn extract_state(&self, state: &AnalysisState) -> ModeState {
        ModeState::Flow(state.flow.clone())
    }

    fn apply_state(&self, state: &mut AnalysisState, mode: ModeState) {
        match mode {
            ModeState::Flow(flow) => state.flow = flow,
            other => log_mismatch(self.analysis_type(), &other),
        }
    }

    fn validate(&self, mode: &ModeState) -> Validation {
        let ModeState::Flow(flow) = mode else {
            log_mismatch(self.analysis_type(), mode);
            return Validation::from_errors(vec!["not a flow configuration".to_string()]);
        };

        let mut errors = Vec::new();
        if flow.cube.as_deref().unwrap_or_default().is_empty() {
            errors.push("select a flow cube".to_string());
        }
        if flow.binding_key.as_deref().unwrap_or_default().is_empty() {
            errors.push("select a binding key".to_string());
        }
        if flow.time_dimension.as_deref().unwrap_or_default().is_empty() {
            errors.push("select a time dimension".to_string());
        }
        if flow
            .starting_step
            .as_ref()
            .map(|s| s.name.is_empty())
            .unwrap_or(true)
        {
            errors.push("define a starting step".to_string());
        }
        Validation::from_errors(errors)
    }

    fn build_request(&self, mode: &ModeState) -> Option<BuiltRequest> {
        let ModeState::Flow(flow) = mode else {
            log_mismatch(self.analysis_type(), mode);
            return None;
        };
        build_flow_query(
            flow.cube.as_deref(),
            flow.binding_key.as_deref(),
            flow.time_dimension.as_deref(),
            flow.date_range.as_ref(),
            flow.starting_step.as_ref(),
            &flow.filters,
            &flow.breakdowns,
        )
        .map(BuiltRequest::Flow)
    }

    fn save(
        &self,
        mode: &ModeState,
        charts: &BTreeMap<AnalysisType, ChartConfig>,
        active_view: ActiveView,
    ) -> AnalysisConfig {
        let flow = match mode {
            ModeState::Flow(flow) => flow.clone(),
            other => {
                log_mismatch(self.analysis_type(), other);
                FlowModeState::default()
            }
        };
        AnalysisConfig {
            version: CONFIG_VERSION,
            payload: ConfigPayload::Flow(FlowPayload {
                flow_cube: flow.cube,
                flow_binding_key: flow.binding_key,
                flow_time_dimension: flow.time_dimension,
                flow_date_range: flow.date_range,
                starting_step: flow.starting_step,
                flow_filters: flow.filters,
                flow_breakdowns: flow.breakdowns,
            }),
            charts: charts.clone(),
            active_view,
        }
    }

    fn load(&self, config: &AnalysisConfig) -> Option<ModeState> {
        if !self.can_load(config) {
            return None;
        }
        let ConfigPayload::Flow(payload) = &config.payload else {
            return None;
        };
        Some(ModeState::Flow(FlowModeState {
            cube: payload.flow_cube.clone(),
            binding_key: payload.flow_binding_key.clone(),
            time_dimension: payload.flow_time_dimension.clone(),
            date_range: payload.flow_date_range.clone(),
            starting_step: payload.starting_step.clone(),
            filters: payload.flow_filters.clone(),
            breakdowns: payload.flow_breakdowns.clone(),
        }))
    }

    fn default_chart_config(&self) -> ChartConfig {
        ChartConfig::new(ChartType::Sankey)
    }
}
