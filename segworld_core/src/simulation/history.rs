// segworld_core/src/simulation/history.rs

use nalgebra::DMatrix;

use crate::types::{DistanceVector, VehicleState};

/// Pre-allocated, index-addressed record of a batch: one pose, one scan and one
/// control value per global timestep.
///
/// Slots below `committed` are final. The closing frame a run leaves at the
/// current index is provisional: the next run's first frame lands on the same
/// index and replaces it.
#[derive(Debug, Clone)]
pub struct History {
    poses: Vec<VehicleState>,
    distances: DMatrix<f64>,
    controls: Vec<f64>,
    cross_check: Option<DMatrix<f64>>,
    committed: usize,
}

impl History {
    pub fn with_capacity(slots: usize, num_rays: usize, cross_check: bool) -> Self {
        Self {
            poses: vec![VehicleState::default(); slots],
            distances: DMatrix::zeros(slots, num_rays),
            controls: vec![0.0; slots],
            cross_check: cross_check.then(|| DMatrix::zeros(slots, num_rays)),
            committed: 0,
        }
    }

    /// Number of slots, written or not.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    // --- Writers (orchestrator only) ---

    /// Writes and commits the frame at `idx`.
    pub(crate) fn record_frame(
        &mut self,
        idx: usize,
        pose: &VehicleState,
        distances: &DistanceVector,
    ) {
        self.write(idx, pose, distances);
        self.committed = idx + 1;
    }

    /// Writes the provisional tail frame at `idx` with a zero control.
    pub(crate) fn record_closing_frame(
        &mut self,
        idx: usize,
        pose: &VehicleState,
        distances: &DistanceVector,
    ) {
        self.write(idx, pose, distances);
        self.controls[idx] = 0.0;
    }

    pub(crate) fn record_control(&mut self, idx: usize, control: f64) {
        debug_assert!(idx < self.committed, "control for a frame never recorded");
        self.controls[idx] = control;
    }

    pub(crate) fn record_cross_check(&mut self, idx: usize, distances: &DistanceVector) {
        if let Some(m) = self.cross_check.as_mut() {
            m.set_row(idx, &distances.transpose());
        }
    }

    /// Keeps slots `[0, len)` and drops the rest.
    pub(crate) fn truncate(&mut self, len: usize) {
        let len = len.min(self.len());
        self.poses.truncate(len);
        self.controls.truncate(len);
        self.distances = self.distances.rows(0, len).into_owned();
        if let Some(m) = self.cross_check.take() {
            self.cross_check = Some(m.rows(0, len).into_owned());
        }
        self.committed = self.committed.min(len);
    }

    fn write(&mut self, idx: usize, pose: &VehicleState, distances: &DistanceVector) {
        debug_assert!(idx >= self.committed, "slot {idx} is already committed");
        self.poses[idx] = *pose;
        self.distances.set_row(idx, &distances.transpose());
    }

    // --- Readers ---

    pub fn poses(&self) -> &[VehicleState] {
        &self.poses
    }

    pub fn pose(&self, idx: usize) -> Option<VehicleState> {
        self.poses.get(idx).copied()
    }

    /// One row per slot, one column per ray.
    pub fn distance_matrix(&self) -> &DMatrix<f64> {
        &self.distances
    }

    pub fn distances(&self, idx: usize) -> Option<DistanceVector> {
        (idx < self.distances.nrows()).then(|| self.distances.row(idx).transpose())
    }

    pub fn controls(&self) -> &[f64] {
        &self.controls
    }

    /// Readings from the secondary sensor, if one is attached.
    pub fn cross_check_matrix(&self) -> Option<&DMatrix<f64>> {
        self.cross_check.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(v: f64) -> DistanceVector {
        DistanceVector::from_element(3, v)
    }

    #[test]
    fn closing_frame_is_superseded_by_the_next_run() {
        let mut h = History::with_capacity(4, 3, false);
        h.record_frame(0, &VehicleState::new(1.0, 0.0, 0.0), &scan(5.0));
        h.record_control(0, 2.0);
        h.record_closing_frame(1, &VehicleState::new(2.0, 0.0, 0.0), &scan(4.0));
        h.record_frame(1, &VehicleState::new(0.0, 0.0, 0.0), &scan(9.0));

        assert_eq!(h.pose(1), Some(VehicleState::new(0.0, 0.0, 0.0)));
        assert_eq!(h.distances(1), Some(scan(9.0)));
        assert_eq!(h.controls()[0], 2.0);
    }

    #[test]
    fn truncate_shrinks_every_buffer() {
        let mut h = History::with_capacity(10, 3, true);
        for i in 0..4 {
            h.record_frame(i, &VehicleState::new(i as f64, 0.0, 0.0), &scan(i as f64));
            h.record_cross_check(i, &scan(i as f64));
        }
        h.truncate(4);

        assert_eq!(h.len(), 4);
        assert_eq!(h.controls().len(), 4);
        assert_eq!(h.distance_matrix().nrows(), 4);
        assert_eq!(h.cross_check_matrix().map(|m| m.nrows()), Some(4));
        assert_eq!(h.distances(3), Some(scan(3.0)));
        assert_eq!(h.distances(4), None);
    }
}
