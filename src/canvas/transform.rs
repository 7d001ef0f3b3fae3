//! Pure transform arithmetic for direct manipulation.

use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 3.0;
pub const ROTATION_STEP_DEG: f32 = 15.;
pub const NUDGE_STEP: f32 = 5.;

/// Scale after a pinch of `factor`, clamped to `[MIN_SCALE, MAX_SCALE]`.
pub fn pinch_scale(scale: f32, factor: f32) -> f32 {
    (scale * factor).clamp(MIN_SCALE, MAX_SCALE)
}

/// Nearest integer with halves rounded towards +∞ (so -2.5 → -2).
#[inline]
pub fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

/// Add `delta` degrees and snap to the rotation grid.
///
/// Snapping applies to the running total, so a gesture that reports many
/// small deltas can stay on the same step.
pub fn snap_rotation(rotation: f32, delta: f32) -> f32 {
    let snapped = round_half_up((rotation + delta) / ROTATION_STEP_DEG) * ROTATION_STEP_DEG;
    // Avoid -0 leaking into displays and comparisons
    snapped + 0.
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl NudgeDirection {
    pub fn delta(self) -> (f32, f32) {
        match self {
            NudgeDirection::Up => (0., -NUDGE_STEP),
            NudgeDirection::Down => (0., NUDGE_STEP),
            NudgeDirection::Left => (-NUDGE_STEP, 0.),
            NudgeDirection::Right => (NUDGE_STEP, 0.),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinch_clamps() {
        assert_eq!(pinch_scale(1., 100.), 3.);
        assert_eq!(pinch_scale(1., 0.01), 0.5);
        assert_eq!(pinch_scale(1., 1.5), 1.5);
    }

    #[test]
    fn test_rotation_snaps_to_step() {
        assert_eq!(snap_rotation(0., 7.), 0.);
        assert_eq!(snap_rotation(0., 10.), 15.);
        assert_eq!(snap_rotation(15., -20.), 0.);
        assert_eq!(snap_rotation(-3., -4.), 0.);
        assert_eq!(snap_rotation(-3., -5.), -15.);
    }

    #[test]
    fn test_round_half_up_matches_script_rounding() {
        assert_eq!(round_half_up(0.5), 1.);
        assert_eq!(round_half_up(-0.5), 0.);
        assert_eq!(round_half_up(-2.5), -2.);
        assert_eq!(round_half_up(2.4), 2.);
    }

    #[test]
    fn test_nudge_deltas() {
        assert_eq!(NudgeDirection::Up.delta(), (0., -5.));
        assert_eq!(NudgeDirection::Right.delta(), (5., 0.));
    }
}
