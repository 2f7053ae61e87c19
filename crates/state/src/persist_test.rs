use std::collections::BTreeMap;
use std::sync::Arc;

use glance_modes::{
    adapter_for, ActiveView, AnalysisType, ChartType, FunnelModeState, ModeState,
};
use glance_query::{BreakdownSelection, DateRange, FunnelStep, StepDefinition};

use crate::container::Workspace;
use crate::persist::{load_workspace, snapshot, WorkspaceSnapshot};
use crate::storage::{MemoryStorage, Storage};
use crate::WORKSPACE_KEY;

#[test]
fn test_round_trip_preserves_every_mode() {
    let storage = Arc::new(MemoryStorage::new());
    let mut workspace = Workspace::load(Arc::clone(&storage) as Arc<dyn Storage>);

    workspace.add_metric("Orders.count");
    workspace.add_breakdown(BreakdownSelection::new("Orders.country"));

    workspace.set_analysis_type(AnalysisType::Funnel);
    workspace.set_funnel_cube("Events");
    workspace.set_funnel_binding_key("Events.userId");
    workspace.set_funnel_time_dimension("Events.timestamp");
    workspace.set_funnel_date_range(DateRange::Value("30d".to_string()));

    workspace.set_analysis_type(AnalysisType::Flow);
    workspace.set_flow_cube("Events");
    workspace.set_flow_starting_step(StepDefinition::new("Signup"));

    workspace.set_analysis_type(AnalysisType::Retention);
    workspace.set_retention_periods(12);

    let loaded = load_workspace(storage.as_ref());
    assert_eq!(loaded.active_type, AnalysisType::Retention);
    assert_eq!(loaded.query.active_state().metrics[0].field, "Orders.count");
    assert_eq!(loaded.query.active_state().breakdowns[0].field, "Orders.country");
    assert_eq!(loaded.funnel.cube.as_deref(), Some("Events"));
    assert_eq!(loaded.funnel.binding_key.as_deref(), Some("Events.userId"));
    assert_eq!(
        loaded.funnel.date_range,
        Some(DateRange::Value("30d".to_string()))
    );
    assert_eq!(
        loaded.flow.starting_step.as_ref().map(|s| s.name.as_str()),
        Some("Signup")
    );
    assert_eq!(loaded.retention.periods, 12);
}

#[test]
fn test_round_trip_preserves_charts_and_views() {
    let storage = Arc::new(MemoryStorage::new());
    let mut workspace = Workspace::load(Arc::clone(&storage) as Arc<dyn Storage>);

    workspace.set_analysis_type(AnalysisType::Flow);
    workspace.set_active_view(ActiveView::Table);
    workspace.set_analysis_type(AnalysisType::Query);

    let loaded = load_workspace(storage.as_ref());
    assert_eq!(
        loaded.chart(AnalysisType::Flow).map(|c| c.chart_type),
        Some(ChartType::Sankey)
    );
    assert_eq!(loaded.active_view(AnalysisType::Flow), ActiveView::Table);
    assert_eq!(loaded.active_view(AnalysisType::Query), ActiveView::Chart);
}

#[test]
fn test_missing_blob_yields_defaults() {
    let storage = MemoryStorage::new();
    let state = load_workspace(&storage);
    assert_eq!(state.active_type, AnalysisType::Query);
    assert!(state.query.active_state().is_empty());
}

#[test]
fn test_corrupt_blob_yields_defaults() {
    let storage = MemoryStorage::new();
    storage.set(WORKSPACE_KEY, "{not json at all");
    let state = load_workspace(&storage);
    assert_eq!(state.active_type, AnalysisType::Query);
    assert!(state.query.active_state().is_empty());
}

#[test]
fn test_unknown_workspace_version_yields_defaults() {
    let storage = MemoryStorage::new();
    let mut workspace = Workspace::load(Arc::new(MemoryStorage::new()) as Arc<dyn Storage>);
    workspace.add_metric("Orders.count");

    let mut blob = snapshot(workspace.state());
    blob.version = 99;
    storage.set(WORKSPACE_KEY, &serde_json::to_string(&blob).unwrap());

    let state = load_workspace(&storage);
    assert!(state.query.active_state().is_empty());
}

#[test]
fn test_unloadable_mode_config_is_skipped() {
    let storage = MemoryStorage::new();
    let mut workspace = Workspace::load(Arc::new(MemoryStorage::new()) as Arc<dyn Storage>);
    workspace.add_metric("Orders.count");
    workspace.set_funnel_cube("Events");

    let mut blob = snapshot(workspace.state());
    blob.modes.query.as_mut().unwrap().version = 99;
    storage.set(WORKSPACE_KEY, &serde_json::to_string(&blob).unwrap());

    let state = load_workspace(&storage);
    // The stale query config falls back to defaults; funnel still loads
    assert!(state.query.active_state().is_empty());
    assert_eq!(state.funnel.cube.as_deref(), Some("Events"));
}

#[test]
fn test_legacy_single_config_migrates() {
    let mut funnel = FunnelModeState::default();
    funnel.cube = Some("Events".to_string());
    funnel.binding_key = Some("Events.userId".to_string());
    funnel.steps[0] = FunnelStep::new("Signup", "Events");
    funnel.steps[1] = FunnelStep::new("Purchase", "Events");

    let adapter = adapter_for(AnalysisType::Funnel);
    let config = adapter.save(
        &ModeState::Funnel(funnel),
        &BTreeMap::new(),
        ActiveView::default(),
    );

    let storage = MemoryStorage::new();
    storage.set(WORKSPACE_KEY, &serde_json::to_string(&config).unwrap());

    let state = load_workspace(&storage);
    assert_eq!(state.active_type, AnalysisType::Funnel);
    assert_eq!(state.funnel.binding_key.as_deref(), Some("Events.userId"));
    assert_eq!(state.funnel.steps[1].name, "Purchase");
    // The migrated mode gets its default chart
    assert_eq!(
        state.chart(AnalysisType::Funnel).map(|c| c.chart_type),
        Some(ChartType::Funnel)
    );
}

#[test]
fn test_snapshot_shape_is_stable() {
    let workspace = Workspace::new();
    let blob = snapshot(workspace.state());
    let value = serde_json::to_value(&blob).unwrap();

    assert_eq!(value["version"], 1);
    assert_eq!(value["activeType"], "query");
    assert_eq!(value["modes"]["query"]["analysisType"], "query");
    assert_eq!(value["modes"]["funnel"]["analysisType"], "funnel");

    let parsed: WorkspaceSnapshot = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, blob);
}
