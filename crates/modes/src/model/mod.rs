//! Mode state models
//!
//! One sub-state per analysis mode plus the composed [`AnalysisState`] the
//! container mutates. Switching the active mode never clears another mode's
//! sub-state.

mod flow;
mod funnel;
mod query;
mod retention;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::{ActiveView, ChartConfig};

pub use flow::FlowModeState;
pub use funnel::FunnelModeState;
pub use query::{MergeStrategy, QueryModeState, QueryTabs, ValidationStatus};
pub use retention::RetentionModeState;

/// The four mutually exclusive analysis modes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    Query,
    Funnel,
    Flow,
    Retention,
}

impl AnalysisType {
    /// All modes, in display order
    pub const ALL: [AnalysisType; 4] = [
        AnalysisType::Query,
        AnalysisType::Funnel,
        AnalysisType::Flow,
        AnalysisType::Retention,
    ];

    /// Wire name of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Funnel => "funnel",
            Self::Flow => "flow",
            Self::Retention => "retention",
        }
    }
}

/// One mode's extracted state
#[derive(Debug, Clone, PartialEq)]
pub enum ModeState {
    Query(QueryTabs),
    Funnel(FunnelModeState),
    Flow(FlowModeState),
    Retention(RetentionModeState),
}

impl ModeState {
    /// The mode this state belongs to
    pub fn analysis_type(&self) -> AnalysisType {
        match self {
            Self::Query(_) => AnalysisType::Query,
            Self::Funnel(_) => AnalysisType::Funnel,
            Self::Flow(_) => AnalysisType::Flow,
            Self::Retention(_) => AnalysisType::Retention,
        }
    }
}

/// The composed configuration state: one sub-state per mode plus the
/// cross-cutting chart and view maps
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisState {
    pub active_type: AnalysisType,
    pub query: QueryTabs,
    pub funnel: FunnelModeState,
    pub flow: FlowModeState,
    pub retention: RetentionModeState,
    /// Per-mode chart preference, filled lazily from adapter defaults
    pub charts: BTreeMap<AnalysisType, ChartConfig>,
    /// Per-mode table/chart view preference
    pub active_views: BTreeMap<AnalysisType, ActiveView>,
}

impl AnalysisState {
    /// Fresh state with the active mode's chart seeded from its adapter
    pub fn new() -> Self {
        let mut state = Self::default();
        state.ensure_chart(state.active_type);
        state
    }

    /// Fill the chart config for a mode from its adapter default if absent
    pub fn ensure_chart(&mut self, mode: AnalysisType) {
        self.charts
            .entry(mode)
            .or_insert_with(|| crate::registry::adapter_for(mode).default_chart_config());
        self.active_views.entry(mode).or_default();
    }

    /// Chart config for a mode, if one has been set or seeded
    pub fn chart(&self, mode: AnalysisType) -> Option<&ChartConfig> {
        self.charts.get(&mode)
    }

    /// View preference for a mode
    pub fn active_view(&self, mode: AnalysisType) -> ActiveView {
        self.active_views.get(&mode).copied().unwrap_or_default()
    }
}
