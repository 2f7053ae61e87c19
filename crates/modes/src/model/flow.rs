//! Flow mode state

use serde::{Deserialize, Serialize};

use glance_query::{DateRange, Filter, StepDefinition};

/// Flow mode: event paths out of a starting step within one cube
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowModeState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// The step paths are explored from; required for execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_step: Option<StepDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdowns: Vec<String>,
}
