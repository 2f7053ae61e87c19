//! Adapter registry
//!
//! Maps a mode identifier to its adapter. This lookup is the only
//! indirection the rest of the system needs to stay mode-agnostic.

use crate::adapter::ModeAdapter;
use crate::adapters::{FlowAdapter, FunnelAdapter, QueryAdapter, RetentionAdapter};
use crate::model::AnalysisType;

static QUERY: QueryAdapter = QueryAdapter;
static FUNNEL: FunnelAdapter = FunnelAdapter;
static FLOW: FlowAdapter = FlowAdapter;
static RETENTION: RetentionAdapter = RetentionAdapter;

/// The adapter for a mode
pub fn adapter_for(analysis_type: AnalysisType) -> &'static dyn ModeAdapter {
    match analysis_type {
        AnalysisType::Query => &QUERY,
        AnalysisType::Funnel => &FUNNEL,
        AnalysisType::Flow => &FLOW,
        AnalysisType::Retention => &RETENTION,
    }
}

/// All adapters, in mode display order
pub fn all_adapters() -> [&'static dyn ModeAdapter; 4] {
    [&QUERY, &FUNNEL, &FLOW, &RETENTION]
}
