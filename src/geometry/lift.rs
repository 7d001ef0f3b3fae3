//! Lifted edge or corner parameters.
//!
//! The flap outline is geometry only. The pipeline keeps the record with the
//! fragment but does not composite the flap onto the note body.

use super::{Path, Point};
use crate::style::Rgba;
use crate::ui::surface::Shadow;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiftSelector {
    Top,
    Right,
    Bottom,
    Left,
    TopRight,
    BottomRight,
    BottomLeft,
    TopLeft,
}

impl LiftSelector {
    pub const ALL: [LiftSelector; 8] = [
        LiftSelector::Top,
        LiftSelector::Right,
        LiftSelector::Bottom,
        LiftSelector::Left,
        LiftSelector::TopRight,
        LiftSelector::BottomRight,
        LiftSelector::BottomLeft,
        LiftSelector::TopLeft,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            LiftSelector::TopRight
                | LiftSelector::BottomRight
                | LiftSelector::BottomLeft
                | LiftSelector::TopLeft
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiftData {
    pub selector: LiftSelector,
    /// Height of the lift in canvas units
    pub amount: f32,
    /// Fraction of the lifted side that rises
    pub width_fraction: f32,
    pub ctrl_offset1: f32,
    pub ctrl_offset2: f32,
}

impl LiftData {
    /// Length of the lifted stretch for a note of the given size. Side flaps
    /// run along the vertical edge, so they take their length from the height;
    /// a width-based length would overrun the short side of a wide note.
    pub fn lift_width(&self, width: f32, height: f32) -> f32 {
        let side = match self.selector {
            LiftSelector::Left | LiftSelector::Right => height,
            _ => width,
        };
        side * self.width_fraction
    }

    /// Drop shadow cast by the flap, offset away from the light by 40% of the
    /// lift amount.
    pub fn shadow(&self) -> Shadow {
        Shadow {
            colour: Rgba::new(0, 0, 0, 0.3),
            blur: 15.,
            offset_x: self.amount * 0.4,
            offset_y: self.amount * 0.4,
        }
    }

    /// Note outline with the lifted flap bulging out of one side, centred on
    /// the origin. Corner selectors produce the plain note rectangle.
    pub fn flap_path(&self, width: f32, height: f32) -> Path {
        let (hw, hh) = (width / 2., height / 2.);
        let a = self.amount;
        let lw = self.lift_width(width, height);
        let (o1, o2) = (self.ctrl_offset1, self.ctrl_offset2);
        // Control-point spans for the falling half of the bulge
        let (r1, r2) = (lw * (1. - o2) * 0.5, lw * (1. - o1) * 0.5);

        let mut path = Path::new();
        match self.selector {
            LiftSelector::Top => {
                path.move_to(Point::new(-hw, -hh));
                path.line_to(Point::new(-lw / 2., -hh));
                path.cubic_to(
                    Point::new(-lw / 2. + lw * o1, -hh - a * 0.5),
                    Point::new(-lw / 2. + lw * o2, -hh - a),
                    Point::new(lw / 2., -hh - a * 0.8),
                );
                path.cubic_to(
                    Point::new(lw / 2. + r1, -hh - a),
                    Point::new(lw / 2. + r2, -hh - a * 0.5),
                    Point::new(hw, -hh),
                );
                path.line_to(Point::new(hw, hh));
                path.line_to(Point::new(-hw, hh));
            }
            LiftSelector::Right => {
                path.move_to(Point::new(-hw, -hh));
                path.line_to(Point::new(hw, -hh));
                path.line_to(Point::new(hw, -lw / 2.));
                path.cubic_to(
                    Point::new(hw + a * 0.5, -lw / 2. + lw * o1),
                    Point::new(hw + a, -lw / 2. + lw * o2),
                    Point::new(hw + a * 0.8, lw / 2.),
                );
                path.cubic_to(
                    Point::new(hw + a, lw / 2. + r1),
                    Point::new(hw + a * 0.5, lw / 2. + r2),
                    Point::new(hw, hh),
                );
                path.line_to(Point::new(-hw, hh));
            }
            LiftSelector::Bottom => {
                path.move_to(Point::new(-hw, -hh));
                path.line_to(Point::new(hw, -hh));
                path.line_to(Point::new(hw, hh));
                path.line_to(Point::new(lw / 2., hh));
                path.cubic_to(
                    Point::new(lw / 2. - lw * o1, hh + a * 0.5),
                    Point::new(lw / 2. - lw * o2, hh + a),
                    Point::new(-lw / 2., hh + a * 0.8),
                );
                path.cubic_to(
                    Point::new(-lw / 2. - r1, hh + a),
                    Point::new(-lw / 2. - r2, hh + a * 0.5),
                    Point::new(-hw, hh),
                );
            }
            LiftSelector::Left => {
                path.move_to(Point::new(-hw, -hh));
                path.line_to(Point::new(-hw, -lw / 2.));
                path.cubic_to(
                    Point::new(-hw - a * 0.5, -lw / 2. + lw * o1),
                    Point::new(-hw - a, -lw / 2. + lw * o2),
                    Point::new(-hw - a * 0.8, lw / 2.),
                );
                path.cubic_to(
                    Point::new(-hw - a, lw / 2. + r1),
                    Point::new(-hw - a * 0.5, lw / 2. + r2),
                    Point::new(-hw, hh),
                );
                path.line_to(Point::new(hw, hh));
                path.line_to(Point::new(hw, -hh));
            }
            _ => return Path::rect(-hw, -hh, width, height),
        }
        path.close();
        path
    }
}

/// Ranges for lift generation.
#[derive(Clone, Debug, PartialEq)]
pub struct LiftCurveGenerator {
    pub amount: (f32, f32),
    pub width_fraction: (f32, f32),
    pub ctrl_offset1: (f32, f32),
    pub ctrl_offset2: (f32, f32),
}

impl Default for LiftCurveGenerator {
    fn default() -> Self {
        Self {
            amount: (10., 25.),
            width_fraction: (0.3, 0.6),
            ctrl_offset1: (0.3, 0.5),
            ctrl_offset2: (0.6, 0.8),
        }
    }
}

impl LiftCurveGenerator {
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> LiftData {
        LiftData {
            selector: LiftSelector::ALL[rng.gen_range(0..LiftSelector::ALL.len())],
            amount: rng.gen_range(self.amount.0..self.amount.1),
            width_fraction: rng.gen_range(self.width_fraction.0..self.width_fraction.1),
            ctrl_offset1: rng.gen_range(self.ctrl_offset1.0..self.ctrl_offset1.1),
            ctrl_offset2: rng.gen_range(self.ctrl_offset2.0..self.ctrl_offset2.1),
        }
    }
}
