//! Adapter implementations, one per mode

mod flow;
mod funnel;
mod query;
mod retention;

pub use flow::FlowAdapter;
pub use funnel::FunnelAdapter;
pub use query::QueryAdapter;
pub use retention::RetentionAdapter;

use tracing::debug;

use crate::model::{AnalysisType, ModeState};

/// Log a state handed to the wrong adapter. Callers going through the
/// registry never hit this; it guards direct misuse.
pub(crate) fn log_mismatch(expected: AnalysisType, got: &ModeState) {
    debug!(
        expected = expected.as_str(),
        got = got.analysis_type().as_str(),
        "mode state handed to the wrong adapter"
    );
}
