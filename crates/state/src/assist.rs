//! AI-assisted query generation state machine
//!
//! Generation is the one inherently asynchronous feature: the host kicks off
//! an external request, then applies the generated selection. The machine
//! itself is synchronous — explicit phases, with a snapshot of the
//! pre-generation state taken on entry so that a cancel restores it exactly.

use glance_modes::{ChartConfig, QueryModeState};

/// Where the generation flow currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationPhase {
    #[default]
    Idle,
    Generating,
    Succeeded,
    Failed,
}

/// Snapshot taken when generation starts
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GenerationSnapshot {
    pub query: QueryModeState,
    pub chart: Option<ChartConfig>,
}

/// The generation state machine
#[derive(Debug, Clone, Default)]
pub struct Generation {
    phase: GenerationPhase,
    error: Option<String>,
    snapshot: Option<GenerationSnapshot>,
}

impl Generation {
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// The failure message, when in the failed phase
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.phase == GenerationPhase::Generating
    }

    /// Enter the generating phase, capturing the restore point.
    /// No-op while a generation is already in flight.
    pub(crate) fn begin(&mut self, query: QueryModeState, chart: Option<ChartConfig>) {
        if self.is_generating() {
            return;
        }
        self.phase = GenerationPhase::Generating;
        self.error = None;
        self.snapshot = Some(GenerationSnapshot { query, chart });
    }

    /// Mark success; the generated state stays applied
    pub(crate) fn complete(&mut self) {
        if self.is_generating() {
            self.phase = GenerationPhase::Succeeded;
            self.snapshot = None;
        }
    }

    /// Mark failure; the restore point is kept so the host may still cancel
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        if self.is_generating() {
            self.phase = GenerationPhase::Failed;
            self.error = Some(message.into());
        }
    }

    /// Leave the flow, yielding the restore point if one is held
    pub(crate) fn cancel(&mut self) -> Option<GenerationSnapshot> {
        let snapshot = self.snapshot.take();
        self.phase = GenerationPhase::Idle;
        self.error = None;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let mut generation = Generation::default();
        assert_eq!(generation.phase(), GenerationPhase::Idle);

        generation.begin(QueryModeState::default(), None);
        assert!(generation.is_generating());

        generation.complete();
        assert_eq!(generation.phase(), GenerationPhase::Succeeded);
        assert!(generation.cancel().is_none());
    }

    #[test]
    fn test_fail_keeps_restore_point() {
        let mut generation = Generation::default();
        let mut query = QueryModeState::default();
        query.add_metric("Orders.count");

        generation.begin(query.clone(), None);
        generation.fail("model unavailable");
        assert_eq!(generation.phase(), GenerationPhase::Failed);
        assert_eq!(generation.error(), Some("model unavailable"));

        let snapshot = generation.cancel().unwrap();
        assert_eq!(snapshot.query, query);
        assert_eq!(generation.phase(), GenerationPhase::Idle);
    }

    #[test]
    fn test_begin_is_not_reentrant() {
        let mut generation = Generation::default();
        let mut query = QueryModeState::default();
        query.add_metric("Orders.count");

        generation.begin(query.clone(), None);
        generation.begin(QueryModeState::default(), None);

        // The first snapshot survives the second begin
        assert_eq!(generation.cancel().unwrap().query, query);
    }
}
