//! Chart configuration
//!
//! Each mode keeps its own chart preference; the maps are keyed by mode so a
//! preference survives mode switches.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chart type for rendering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
    Area,
    Pie,
    Table,
    Number,
    Funnel,
    Sankey,
    Heatmap,
}

/// Chart preference for one mode
///
/// `chart_config` and `display_config` are passed through to the renderer
/// opaquely; this engine only stores them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub chart_type: ChartType,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub chart_config: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub display_config: Value,
}

impl ChartConfig {
    /// Create a config with a chart type and no renderer options
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            chart_config: Value::Null,
            display_config: Value::Null,
        }
    }
}

/// Which surface is showing for a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    Table,
    #[default]
    Chart,
}
