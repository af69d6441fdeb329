// segworld_core/src/simulation/records.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::control::ControllerKind;

/// Why a single run stopped. None of these are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The newest scan had a reading under the collision threshold.
    Collided,
    /// The run outlived its per-run step cap without colliding.
    StepLimit,
    /// The global index reached the cutoff or the end of the horizon.
    Cutoff,
}

/// One contiguous stretch `[start_index, end_index]` of the global history,
/// driven by a single controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub start_index: usize,
    pub end_index: usize,
    /// Always `end_index - start_index`.
    pub duration: usize,
    pub controller_type: ControllerKind,
    pub run_number: usize,
    pub termination: Termination,
}

/// Which controller was in charge from which global index onward.
///
/// Append-only while a batch runs; read back during playback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerSchedule {
    order: Vec<ControllerKind>,
    first_index: BTreeMap<ControllerKind, usize>,
}

impl ControllerSchedule {
    /// Records `kind` as active from `index`. Only the first registration of a
    /// kind counts.
    pub fn register(&mut self, kind: ControllerKind, index: usize) {
        if !self.first_index.contains_key(&kind) {
            self.order.push(kind);
            self.first_index.insert(kind, index);
        }
    }

    pub fn order(&self) -> &[ControllerKind] {
        &self.order
    }

    pub fn index_map(&self) -> &BTreeMap<ControllerKind, usize> {
        &self.first_index
    }

    /// The controller active at `index`: the latest-registered kind whose first
    /// index is at or before `index`, falling back to the first kind.
    pub fn controller_type_at(&self, index: usize) -> Option<ControllerKind> {
        let first = *self.order.first()?;
        Some(
            self.order[1..]
                .iter()
                .copied()
                .filter(|kind| index >= self.first_index[kind])
                .last()
                .unwrap_or(first),
        )
    }
}

/// Totals for one `run_batch_simulation` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: usize,
    pub collisions: usize,
    pub step_limits: usize,
    pub cutoffs: usize,
    pub final_counter: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[RunRecord], final_counter: usize) -> Self {
        let count = |t: Termination| records.iter().filter(|r| r.termination == t).count();
        Self {
            runs: records.len(),
            collisions: count(Termination::Collided),
            step_limits: count(Termination::StepLimit),
            cutoffs: count(Termination::Cutoff),
            final_counter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_schedule_knows_nothing() {
        assert_eq!(ControllerSchedule::default().controller_type_at(0), None);
    }

    #[test]
    fn later_kinds_take_over_from_their_first_index() {
        let mut schedule = ControllerSchedule::default();
        schedule.register(ControllerKind::Default, 0);
        schedule.register(ControllerKind::Straight, 50);
        // Re-registering does not move the boundary.
        schedule.register(ControllerKind::Straight, 80);

        assert_eq!(schedule.order(), &[ControllerKind::Default, ControllerKind::Straight]);
        assert_eq!(schedule.controller_type_at(0), Some(ControllerKind::Default));
        assert_eq!(schedule.controller_type_at(49), Some(ControllerKind::Default));
        assert_eq!(schedule.controller_type_at(50), Some(ControllerKind::Straight));
        assert_eq!(schedule.controller_type_at(500), Some(ControllerKind::Straight));
    }

    #[test]
    fn summary_counts_each_termination() {
        let record = |start, end, termination| RunRecord {
            start_index: start,
            end_index: end,
            duration: end - start,
            controller_type: ControllerKind::Default,
            run_number: start,
            termination,
        };
        let records = [
            record(0, 3, Termination::Collided),
            record(3, 9, Termination::StepLimit),
            record(9, 12, Termination::Collided),
            record(12, 13, Termination::Cutoff),
        ];
        let summary = BatchSummary::from_records(&records, 13);
        assert_eq!(summary.runs, 4);
        assert_eq!(summary.collisions, 2);
        assert_eq!(summary.step_limits, 1);
        assert_eq!(summary.cutoffs, 1);
    }
}
