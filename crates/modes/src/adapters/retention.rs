//! Retention mode adapter

use std::collections::BTreeMap;

use chrono::Utc;

use glance_query::build_retention_query;

use crate::adapter::{BuiltRequest, ModeAdapter, Validation};
use crate::adapters::log_mismatch;
use crate::chart::{ActiveView, ChartConfig, ChartType};
use crate::config::{AnalysisConfig, ConfigPayload, RetentionPayload, CONFIG_VERSION};
use crate::model::{AnalysisState, AnalysisType, ModeState, RetentionModeState};

/// Periods beyond this count are allowed but flagged as a warning
const PERIOD_WARNING_THRESHOLD: u32 = 52;

/// Adapter for retention mode
pub struct RetentionAdapter;

impl ModeAdapter for RetentionAdapter {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Retention
    }

    fn extract_state(&self, state: &AnalysisState) -> ModeState {
        ModeState::Retention(state.retention.clone())
    }

    fn apply_state(&self, state: &mut AnalysisState, mode: ModeState) {
        match mode {
            ModeState::Retention(retention) => state.retention = retention,
            other => log_mismatch(self.analysis_type(), &other),
        }
    }

    fn validate(&self, mode: &ModeState) -> Validation {
        let ModeState::Retention(retention) = mode else {
            log_mismatch(self.analysis_type(), mode);
            return Validation::from_errors(vec!["not a retention configuration".to_string()]);
        };

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        if retention.cube.as_deref().unwrap_or_default().is_empty() {
            errors.push("select a retention cube".to_string());
        }
        if retention
            .binding_key
            .as_deref()
            .unwrap_or_default()
            .is_empty()
        {
            errors.push("select a binding key".to_string());
        }
        if retention
            .time_dimension
            .as_deref()
            .unwrap_or_default()
            .is_empty()
        {
            errors.push("select a time dimension".to_string());
        }
        match &retention.date_range {
            None => errors.push("select a cohort date range".to_string()),
            Some(range) => {
                if let Err(err) = range.resolve(Utc::now().date_naive()) {
                    errors.push(err.to_string());
                }
            }
        }
        if retention.periods == 0 {
            errors.push("periods must be at least 1".to_string());
        } else if retention.periods > PERIOD_WARNING_THRESHOLD {
            warnings.push(format!(
                "{} periods requested; results are truncated to {} in most views",
                retention.periods, PERIOD_WARNING_THRESHOLD
            ));
        }
        Validation::from_errors(errors).with_warnings(warnings)
    }

    fn build_request(&self, mode: &ModeState) -> Option<BuiltRequest> {
        let ModeState::Retention(retention) = mode else {
            log_mismatch(self.analysis_type(), mode);
            return None;
        };
        build_retention_query(
            retention.cube.as_deref(),
            retention.binding_key.as_deref(),
            retention.time_dimension.as_deref(),
            retention.date_range.as_ref(),
            &retention.cohort_filters,
            &retention.activity_filters,
            retention.periods,
            retention.granularity,
            Utc::now().date_naive(),
        )
        .map(BuiltRequest::Retention)
    }

    fn save(
        &self,
        mode: &ModeState,
        charts: &BTreeMap<AnalysisType, ChartConfig>,
        active_view: ActiveView,
    ) -> AnalysisConfig {
        let retention = match mode {
            ModeState::Retention(retention) => retention.clone(),
            other => {
                log_mismatch(self.analysis_type(), other);
                RetentionModeState::default()
            }
        };
        AnalysisConfig {
            version: CONFIG_VERSION,
            payload: ConfigPayload::Retention(RetentionPayload {
                retention_cube: retention.cube,
                retention_binding_key: retention.binding_key,
                retention_time_dimension: retention.time_dimension,
                retention_date_range: retention.date_range,
                cohort_filters: retention.cohort_filters,
                activity_filters: retention.activity_filters,
                periods: retention.periods,
                granularity: retention.granularity,
            }),
            charts: charts.clone(),
            active_view,
        }
    }

    fn load(&self, config: &AnalysisConfig) -> Option<ModeState> {
        if !self.can_load(config) {
            return None;
        }
        let ConfigPayload::Retention(payload) = &config.payload else {
            return None;
        };
        Some(ModeState::Retention(RetentionModeState {
            cube: payload.retention_cube.clone(),
            binding_key: payload.retention_binding_key.clone(),
            time_dimension: payload.retention_time_dimension.clone(),
            date_range: payload.retention_date_range.clone(),
            cohort_filters: payload.cohort_filters.clone(),
            activity_filters: payload.activity_filters.clone(),
            periods: payload.periods,
            granularity: payload.granularity,
        }))
    }

    fn default_chart_config(&self) -> ChartConfig {
        ChartConfig::new(ChartType::Heatmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_query::DateRange;

    fn complete_retention() -> RetentionModeState {
        RetentionModeState {
            cube: Some("Users".to_string()),
            binding_key: Some("Users.id".to_string()),
            time_dimension: Some("Users.signedUpAt".to_string()),
            date_range: Some(DateRange::span("2024-01-01", "2024-01-31")),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_reports_each_missing_piece() {
        let validation =
            RetentionAdapter.validate(&ModeState::Retention(RetentionModeState::default()));
        assert!(!validation.is_valid);
        // cube, binding key, time dimension, date range
        assert_eq!(validation.errors.len(), 4);

        let validation = RetentionAdapter.validate(&ModeState::Retention(complete_retention()));
        assert!(validation.is_valid);
        assert!(validation.warnings.is_empty());
    }

    #[test]
    fn test_validate_rejects_backwards_range_and_zero_periods() {
        let mut retention = complete_retention();
        retention.date_range = Some(DateRange::span("2024-02-01", "2024-01-01"));
        retention.periods = 0;
        let validation = RetentionAdapter.validate(&ModeState::Retention(retention));
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 2);
    }

    #[test]
    fn test_many_periods_is_a_warning_not_an_error() {
        let mut retention = complete_retention();
        retention.periods = 104;
        let validation = RetentionAdapter.validate(&ModeState::Retention(retention));
        assert!(validation.is_valid);
        assert_eq!(validation.warnings.len(), 1);
    }

    #[test]
    fn test_round_trip_builds_same_request() {
        let mode = ModeState::Retention(complete_retention());
        let before = RetentionAdapter.build_request(&mode);
        assert!(before.is_some());

        let config = RetentionAdapter.save(&mode, &BTreeMap::new(), ActiveView::Chart);
        let loaded = RetentionAdapter.load(&config).unwrap();
        assert_eq!(RetentionAdapter.build_request(&loaded), before);
        assert_eq!(loaded, mode);
    }

    #[test]
    fn test_default_chart_is_heatmap() {
        assert_eq!(
            RetentionAdapter.default_chart_config().chart_type,
            ChartType::Heatmap
        );
    }
}
