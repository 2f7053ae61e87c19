//! The mode adapter contract
//!
//! Every mode implements the same operations so the rest of the system stays
//! mode-agnostic: extract its slice of the composed state, validate it, build
//! the backend request, and save/load the versioned config unit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use glance_query::{FlowRequest, FunnelRequest, QueryRequest, RetentionRequest};

use crate::chart::{ActiveView, ChartConfig};
use crate::config::{AnalysisConfig, CONFIG_VERSION};
use crate::model::{AnalysisState, AnalysisType, MergeStrategy, ModeState};

/// Result of a mode's completeness check
///
/// Incompleteness is data, not an exception: callers check `is_valid` before
/// attempting execution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Validation {
    /// A passing validation
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Valid exactly when `errors` is empty
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Attach warnings (do not affect validity)
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// An executable request built from one mode's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuiltRequest {
    /// One request per query tab plus the combination policy
    #[serde(rename_all = "camelCase")]
    Query {
        requests: Vec<QueryRequest>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        merge_keys: Option<Vec<String>>,
        strategy: MergeStrategy,
    },
    Funnel(FunnelRequest),
    Flow(FlowRequest),
    Retention(RetentionRequest),
}

/// Uniform per-mode operations
///
/// One static implementation exists per [`AnalysisType`]; look them up with
/// [`crate::registry::adapter_for`]. Implementations never panic on a
/// mismatched [`ModeState`] variant: they log and return a neutral value.
pub trait ModeAdapter: Send + Sync {
    /// The mode this adapter serves
    fn analysis_type(&self) -> AnalysisType;

    /// Pull this mode's slice out of the composed state
    fn extract_state(&self, state: &AnalysisState) -> ModeState;

    /// Write a mode slice back into the composed state
    fn apply_state(&self, state: &mut AnalysisState, mode: ModeState);

    /// Completeness rules for this mode
    fn validate(&self, mode: &ModeState) -> Validation;

    /// Build the executable request; `None` means "not yet executable"
    fn build_request(&self, mode: &ModeState) -> Option<BuiltRequest>;

    /// Produce the versioned, mode-tagged serializable unit
    fn save(
        &self,
        mode: &ModeState,
        charts: &BTreeMap<AnalysisType, ChartConfig>,
        active_view: ActiveView,
    ) -> AnalysisConfig;

    /// Structural guard checked before [`ModeAdapter::load`]
    ///
    /// Must not mutate anything; a failing guard is a no-op for the caller.
    fn can_load(&self, config: &AnalysisConfig) -> bool {
        if config.version != CONFIG_VERSION {
            debug!(
                version = config.version,
                mode = self.analysis_type().as_str(),
                "rejecting config with unknown version"
            );
            return false;
        }
        if config.payload.analysis_type() != self.analysis_type() {
            debug!(
                got = config.payload.analysis_type().as_str(),
                expected = self.analysis_type().as_str(),
                "rejecting config for a different mode"
            );
            return false;
        }
        true
    }

    /// Inverse of [`ModeAdapter::save`]
    ///
    /// For any valid state `s`, `load(save(s))` is state-equivalent to `s`:
    /// it builds the same request. Returns `None` when `can_load` fails.
    fn load(&self, config: &AnalysisConfig) -> Option<ModeState>;

    /// The chart this mode starts with
    fn default_chart_config(&self) -> ChartConfig;
}
