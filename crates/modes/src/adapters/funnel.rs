//! Funnel mode adapter

use std::collections::BTreeMap;

use glance_query::build_funnel_query;

use crate::adapter::{BuiltRequest, ModeAdapter, Validation};
use crate::adapters::log_mismatch;
use crate::chart::{ActiveView, ChartConfig, ChartType};
use crate::config::{AnalysisConfig, ConfigPayload, FunnelPayload, CONFIG_VERSION};
use crate::model::{AnalysisState, AnalysisType, FunnelModeState, ModeState};

/// Adapter for funnel mode
pub struct FunnelAdapter;

impl ModeAdapter for FunnelAdapter {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Funnel
    }

    fn extract_state(&self, state: &AnalysisState) -> ModeState {
        ModeState::Funnel(state.funnel.clone())
    }

    fn apply_state(&self, state: &mut AnalysisState, mode: ModeState) {
        match mode {
            ModeState::Funnel(funnel) => state.funnel = funnel,
            other => log_mismatch(self.analysis_type(), &other),
        }
    }

    fn validate(&self, mode: &ModeState) -> Validation {
        let ModeState::Funnel(funnel) = mode else {
            log_mismatch(self.analysis_type(), mode);
            return Validation::from_errors(vec!["not a funnel configuration".to_string()]);
        };

        let mut errors = Vec::new();
        if funnel.cube.as_deref().unwrap_or_default().is_empty() {
            errors.push("select a funnel cube".to_string());
        }
        if funnel.binding_key.as_deref().unwrap_or_default().is_empty() {
            errors.push("select a binding key".to_string());
        }
        if funnel
            .time_dimension
            .as_deref()
            .unwrap_or_default()
            .is_empty()
        {
            errors.push("select a time dimension".to_string());
        }
        let usable = funnel.steps.iter().filter(|s| s.is_usable()).count();
        if usable < 2 {
            errors.push("define at least two funnel steps with an event and a name".to_string());
        }
        Validation::from_errors(errors)
    }

    fn build_request(&self, mode: &ModeState) -> Option<BuiltRequest> {
        let ModeState::Funnel(funnel) = mode else {
            log_mismatch(self.analysis_type(), mode);
            return None;
        };
        build_funnel_query(
            funnel.binding_key.as_deref(),
            funnel.time_dimension.as_deref(),
            funnel.date_range.as_ref(),
            &funnel.steps,
        )
        .map(BuiltRequest::Funnel)
    }

    fn save(
        &self,
        mode: &ModeState,
        charts: &BTreeMap<AnalysisType, ChartConfig>,
        active_view: ActiveView,
    ) -> AnalysisConfig {
        let funnel = match mode {
            ModeState::Funnel(funnel) => funnel.clone(),
            other => {
                log_mismatch(self.analysis_type(), other);
                FunnelModeState::default()
            }
        };
        AnalysisConfig {
            version: CONFIG_VERSION,
            payload: ConfigPayload::Funnel(FunnelPayload {
                funnel_cube: funnel.cube,
                funnel_binding_key: funnel.binding_key,
                funnel_time_dimension: funnel.time_dimension,
                funnel_date_range: funnel.date_range,
                funnel_steps: funnel.steps,
                active_funnel_step_index: funnel.active_step_index,
            }),
            charts: charts.clone(),
            active_view,
        }
    }

    fn load(&self, config: &AnalysisConfig) -> Option<ModeState> {
        if !self.can_load(config) {
            return None;
        }
        let ConfigPayload::Funnel(payload) = &config.payload else {
            return None;
        };

        let mut funnel = FunnelModeState {
            cube: payload.funnel_cube.clone(),
            binding_key: payload.funnel_binding_key.clone(),
            time_dimension: payload.funnel_time_dimension.clone(),
            date_range: payload.funnel_date_range.clone(),
            steps: payload.funnel_steps.clone(),
            active_step_index: payload.active_funnel_step_index,
        };
        if funnel.steps.is_empty() {
            funnel = FunnelModeState {
                steps: FunnelModeState::default().steps,
                ..funnel
            };
        }
        funnel.active_step_index = funnel.active_step_index.min(funnel.steps.len() - 1);
        Some(ModeState::Funnel(funnel))
    }

    fn default_chart_config(&self) -> ChartConfig {
        ChartConfig::new(ChartType::Funnel)
    }
}
