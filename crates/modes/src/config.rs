//! The single-mode serializable unit
//!
//! An [`AnalysisConfig`] snapshots one mode's configuration: versioned,
//! tagged with its mode, carrying the chart map and view preference. It is
//! the format used for shareable links and embedded saved views; the
//! cross-mode snapshot that persists the whole workspace lives one layer up.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use glance_query::{DateRange, Filter, FunnelStep, StepDefinition};

use crate::chart::{ActiveView, ChartConfig};
use crate::model::{AnalysisType, MergeStrategy, QueryModeState};

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// A saved, versioned snapshot of one mode's configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub version: u32,
    #[serde(flatten)]
    pub payload: ConfigPayload,
    /// All modes' chart preferences travel with any saved view
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub charts: BTreeMap<AnalysisType, ChartConfig>,
    #[serde(default)]
    pub active_view: ActiveView,
}

/// The mode-specific body, tagged by `analysisType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysisType", rename_all = "lowercase")]
pub enum ConfigPayload {
    Query(QueryPayload),
    Funnel(FunnelPayload),
    Flow(FlowPayload),
    Retention(RetentionPayload),
}

impl ConfigPayload {
    /// The mode this payload belongs to
    pub fn analysis_type(&self) -> AnalysisType {
        match self {
            Self::Query(_) => AnalysisType::Query,
            Self::Funnel(_) => AnalysisType::Funnel,
            Self::Flow(_) => AnalysisType::Flow,
            Self::Retention(_) => AnalysisType::Retention,
        }
    }
}

/// Saved query-mode body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    pub query_states: Vec<QueryModeState>,
    #[serde(default)]
    pub active_query_index: usize,
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_keys: Option<Vec<String>>,
}

/// Saved funnel-mode body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel_cube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel_binding_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel_time_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel_date_range: Option<DateRange>,
    pub funnel_steps: Vec<FunnelStep>,
    #[serde(default)]
    pub active_funnel_step_index: usize,
}

/// Saved flow-mode body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_cube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_binding_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_time_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_step: Option<StepDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flow_filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flow_breakdowns: Vec<String>,
}

/// Saved retention-mode body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_cube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_binding_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_time_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cohort_filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity_filters: Vec<Filter>,
    pub periods: u32,
    pub granularity: glance_query::Granularity,
}
