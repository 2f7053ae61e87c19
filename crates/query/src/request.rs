//! Backend request shapes
//!
//! These are the canonical JSON shapes the query-execution backend consumes.
//! This crate only produces them; execution is external. Absence of a section
//! (no `measures` key at all) is the wire signal for "none requested" — empty
//! arrays are never emitted.

use serde::{Deserialize, Serialize};

use crate::daterange::DateRange;
use crate::filter::Filter;
use crate::selection::{Granularity, SortDirection};

/// A plain analytical query request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measures: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_dimensions: Option<Vec<TimeDimensionRequest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<(String, SortDirection)>>,
}

/// A time dimension entry in a query request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeDimensionRequest {
    pub dimension: String,
    pub granularity: Granularity,
    /// Current and prior period, when comparison is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_date_range: Option<Vec<[String; 2]>>,
}

/// Funnel request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelRequest {
    pub funnel: FunnelBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelBody {
    pub binding_key: String,
    pub time_dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub steps: Vec<FunnelStepRequest>,
    pub include_time_metrics: bool,
}

/// One step of a funnel request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStepRequest {
    pub name: String,
    pub cube: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    /// ISO-8601 duration bounding the step-to-step conversion window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_convert: Option<String>,
}

/// Flow request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRequest {
    pub flow: FlowBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowBody {
    pub cube: String,
    pub binding_key: String,
    pub time_dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub starting_step: FlowStepRequest,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdowns: Vec<String>,
}

/// The starting step of a flow request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStepRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

/// Retention request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionRequest {
    pub retention: RetentionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionBody {
    pub cube: String,
    pub binding_key: String,
    pub time_dimension: String,
    /// Resolved cohort window as `[start, end]`
    pub date_range: [String; 2],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cohort_filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity_filters: Vec<Filter>,
    pub periods: u32,
    pub granularity: Granularity,
}
