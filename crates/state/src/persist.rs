//! Workspace persistence
//!
//! The cross-mode snapshot: every mode's [`AnalysisConfig`] plus the active
//! mode, versioned, written as one blob so that switching modes, reloading,
//! or sharing never silently discards unrelated work. Loading is tolerant by
//! design — corrupt or unknown data falls back to fresh defaults, and a
//! legacy single-mode config found where a snapshot was expected is migrated
//! into its one mode.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use glance_modes::{adapter_for, all_adapters, AnalysisConfig, AnalysisState, AnalysisType};

use crate::storage::Storage;

/// Storage key for the workspace blob
pub const WORKSPACE_KEY: &str = "glance.workspace";
/// Storage key for the recently-used-fields list
pub const RECENT_FIELDS_KEY: &str = "glance.recent-fields";

/// Current workspace format version
pub const WORKSPACE_VERSION: u32 = 1;

/// The serialized form of the whole multi-mode workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub version: u32,
    pub active_type: AnalysisType,
    pub modes: ModeConfigs,
}

/// Per-mode saved configs; absent modes load as defaults
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeConfigs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<AnalysisConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel: Option<AnalysisConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<AnalysisConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<AnalysisConfig>,
}

impl ModeConfigs {
    fn get(&self, mode: AnalysisType) -> Option<&AnalysisConfig> {
        match mode {
            AnalysisType::Query => self.query.as_ref(),
            AnalysisType::Funnel => self.funnel.as_ref(),
            AnalysisType::Flow => self.flow.as_ref(),
            AnalysisType::Retention => self.retention.as_ref(),
        }
    }

    fn set(&mut self, mode: AnalysisType, config: AnalysisConfig) {
        match mode {
            AnalysisType::Query => self.query = Some(config),
            AnalysisType::Funnel => self.funnel = Some(config),
            AnalysisType::Flow => self.flow = Some(config),
            AnalysisType::Retention => self.retention = Some(config),
        }
    }
}

/// Snapshot the composed state via each mode's adapter
pub fn snapshot(state: &AnalysisState) -> WorkspaceSnapshot {
    let mut modes = ModeConfigs::default();
    for adapter in all_adapters() {
        let mode = adapter.analysis_type();
        let config = adapter.save(
            &adapter.extract_state(state),
            &state.charts,
            state.active_view(mode),
        );
        modes.set(mode, config);
    }
    WorkspaceSnapshot {
        version: WORKSPACE_VERSION,
        active_type: state.active_type,
        modes,
    }
}

/// Rebuild composed state from a snapshot
///
/// Modes whose config fails the adapter's `can_load` guard keep their
/// defaults; nothing here errors or panics.
pub fn restore(snapshot: &WorkspaceSnapshot) -> AnalysisState {
    if snapshot.version != WORKSPACE_VERSION {
        warn!(
            version = snapshot.version,
            "unknown workspace version; starting fresh"
        );
        return AnalysisState::new();
    }

    let mut state = AnalysisState::default();
    state.active_type = snapshot.active_type;
    for adapter in all_adapters() {
        let mode = adapter.analysis_type();
        let Some(config) = snapshot.modes.get(mode) else {
            continue;
        };
        if !adapter.can_load(config) {
            debug!(mode = mode.as_str(), "skipping unloadable mode config");
            continue;
        }
        if let Some(loaded) = adapter.load(config) {
            adapter.apply_state(&mut state, loaded);
        }
        for (chart_mode, chart) in &config.charts {
            state.charts.entry(*chart_mode).or_insert_with(|| chart.clone());
        }
        state.active_views.insert(mode, config.active_view);
    }
    state.ensure_chart(state.active_type);
    state
}

/// Serialize and write the workspace blob; fire-and-forget
pub fn save_workspace(state: &AnalysisState, storage: &dyn Storage) {
    match serde_json::to_string(&snapshot(state)) {
        Ok(raw) => storage.set(WORKSPACE_KEY, &raw),
        Err(err) => warn!(error = %err, "workspace serialization failed"),
    }
}

/// Read and restore the workspace blob
///
/// Missing, corrupt, or unrecognized data yields fresh defaults. A bare
/// single-mode [`AnalysisConfig`] is accepted as a legacy format and
/// migrated into its one mode.
pub fn load_workspace(storage: &dyn Storage) -> AnalysisState {
    let Some(raw) = storage.get(WORKSPACE_KEY) else {
        return AnalysisState::new();
    };

    if let Ok(parsed) = serde_json::from_str::<WorkspaceSnapshot>(&raw) {
        return restore(&parsed);
    }

    if let Ok(legacy) = serde_json::from_str::<AnalysisConfig>(&raw) {
        return migrate_legacy(&legacy);
    }

    warn!("unreadable workspace blob; starting fresh");
    AnalysisState::new()
}

/// Load a legacy single-mode config into an otherwise-default workspace
fn migrate_legacy(config: &AnalysisConfig) -> AnalysisState {
    let mode = config.payload.analysis_type();
    info!(mode = mode.as_str(), "migrating legacy single-mode config");

    let mut state = AnalysisState::default();
    let adapter = adapter_for(mode);
    if adapter.can_load(config) {
        if let Some(loaded) = adapter.load(config) {
            adapter.apply_state(&mut state, loaded);
        }
        state.charts = config.charts.clone();
        state.active_views.insert(mode, config.active_view);
    }
    state.active_type = mode;
    state.ensure_chart(mode);
    state
}
