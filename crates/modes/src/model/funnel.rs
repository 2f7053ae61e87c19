//! Funnel mode state

use serde::{Deserialize, Serialize};

use glance_query::{DateRange, FunnelStep};

/// Funnel mode: an ordered list of steps over a shared binding key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelModeState {
    /// Cube the binding key and time dimension are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cube: Option<String>,
    /// Dimension identifying "the same entity" across steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub steps: Vec<FunnelStep>,
    #[serde(default)]
    pub active_step_index: usize,
}

impl Default for FunnelModeState {
    fn default() -> Self {
        // Two placeholder steps: a funnel needs at least two to execute
        Self {
            cube: None,
            binding_key: None,
            time_dimension: None,
            date_range: None,
            steps: vec![FunnelStep::empty(), FunnelStep::empty()],
            active_step_index: 0,
        }
    }
}

impl FunnelModeState {
    /// Append a step and return its id
    pub fn add_step(&mut self, step: FunnelStep) -> String {
        let id = step.id.clone();
        self.steps.push(step);
        id
    }

    /// Remove a step by id
    pub fn remove_step(&mut self, id: &str) {
        self.steps.retain(|s| s.id != id);
        if !self.steps.is_empty() {
            self.active_step_index = self.active_step_index.min(self.steps.len() - 1);
        } else {
            self.active_step_index = 0;
        }
    }

    /// Find a step by id, mutable
    pub fn step_mut(&mut self, id: &str) -> Option<&mut FunnelStep> {
        self.steps.iter_mut().find(|s| s.id == id)
    }
}
