// segworld_core/src/control/counting.rs

use super::{ControlCommand, Controller};
use crate::types::{DistanceVector, VehicleState};

/// Turns away from whichever half of the ray fan sees more obstacles.
///
/// The scan is split at `N / 2`: rays `[0, N/2)` form the first (clockwise)
/// half and `[N/2, N)` the second, so with an odd ray count the centre ray
/// belongs to the second half. A reading is a hit when it is below
/// `ray_length - hit_tolerance`.
#[derive(Debug, Clone)]
pub struct CountingController {
    pub ray_length: f64,
    pub hit_tolerance: f64,
}

impl CountingController {
    pub fn new(ray_length: f64, hit_tolerance: f64) -> Self {
        Self {
            ray_length,
            hit_tolerance,
        }
    }

    /// Hit counts for the first and second halves of the scan.
    pub fn hit_counts(&self, distances: &DistanceVector) -> (usize, usize) {
        let limit = self.ray_length - self.hit_tolerance;
        let split = distances.len() / 2;
        let count = |d: &[f64]| d.iter().filter(|&&r| r < limit).count();
        let all = distances.as_slice();
        (count(&all[..split]), count(&all[split..]))
    }
}

impl Controller for CountingController {
    fn compute_control_input(
        &self,
        _state: &VehicleState,
        distances: &DistanceVector,
    ) -> ControlCommand {
        let (first, second) = self.hit_counts(distances);
        if first == second {
            ControlCommand::Straight
        } else if first > second {
            ControlCommand::Left
        } else {
            ControlCommand::Right
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: f64 = 20.0;

    fn decide(readings: Vec<f64>) -> ControlCommand {
        CountingController::new(RANGE, 1e-3)
            .compute_control_input(&VehicleState::default(), &DistanceVector::from_vec(readings))
    }

    #[test]
    fn all_clear_goes_straight() {
        assert_eq!(decide(vec![RANGE; 21]), ControlCommand::Straight);
    }

    #[test]
    fn equal_counts_go_straight() {
        assert_eq!(decide(vec![3.0, RANGE, RANGE, 3.0]), ControlCommand::Straight);
    }

    #[test]
    fn denser_first_half_turns_left() {
        assert_eq!(decide(vec![3.0, 4.0, RANGE, 5.0]), ControlCommand::Left);
    }

    #[test]
    fn denser_second_half_turns_right() {
        assert_eq!(decide(vec![RANGE, RANGE, 2.0, RANGE]), ControlCommand::Right);
    }

    #[test]
    fn odd_count_puts_centre_ray_in_second_half() {
        let controller = CountingController::new(RANGE, 1e-3);
        let scan = DistanceVector::from_vec(vec![RANGE, RANGE, 1.0, RANGE, RANGE]);
        assert_eq!(controller.hit_counts(&scan), (0, 1));
        assert_eq!(decide(scan.as_slice().to_vec()), ControlCommand::Right);
    }

    #[test]
    fn readings_within_tolerance_of_range_count_as_clear() {
        let controller = CountingController::new(RANGE, 1e-3);
        let scan = DistanceVector::from_vec(vec![RANGE - 5e-4, RANGE - 2e-3]);
        assert_eq!(controller.hit_counts(&scan), (0, 1));
    }

    #[test]
    fn tie_break_law_holds_for_every_split() {
        // Every hit/clear pattern over six rays.
        for mask in 0u32..64 {
            let readings: Vec<f64> = (0..6)
                .map(|i| if mask & (1 << i) != 0 { 1.0 } else { RANGE })
                .collect();
            let first = (mask & 0b000111).count_ones();
            let second = (mask & 0b111000).count_ones();
            let expected = match first.cmp(&second) {
                std::cmp::Ordering::Equal => ControlCommand::Straight,
                std::cmp::Ordering::Greater => ControlCommand::Left,
                std::cmp::Ordering::Less => ControlCommand::Right,
            };
            assert_eq!(decide(readings), expected, "mask {mask:06b}");
        }
    }
}
