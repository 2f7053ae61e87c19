//! Retention mode state

use serde::{Deserialize, Serialize};

use glance_query::{DateRange, Filter, Granularity};

/// Default number of periods tracked after the cohort window
pub const DEFAULT_RETENTION_PERIODS: u32 = 8;

/// Retention mode: cohort definition plus return-activity tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionModeState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_dimension: Option<String>,
    /// Cohort window; required for execution, start must not exceed end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// Filters defining who enters the cohort
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cohort_filters: Vec<Filter>,
    /// Filters defining what counts as coming back
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity_filters: Vec<Filter>,
    pub periods: u32,
    pub granularity: Granularity,
}

impl Default for RetentionModeState {
    fn default() -> Self {
        Self {
            cube: None,
            binding_key: None,
            time_dimension: None,
            date_range: None,
            cohort_filters: Vec::new(),
            activity_filters: Vec::new(),
            periods: DEFAULT_RETENTION_PERIODS,
            granularity: Granularity::Week,
        }
    }
}
