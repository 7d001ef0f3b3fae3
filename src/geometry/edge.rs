//! Torn-edge outline generation.
//!
//! A note outline is a closed 40-point polygon in normalised coordinates
//! (roughly `[-1, 1]` on both axes), walked clockwise from the top-left
//! corner: ten points along each of the top, right, bottom and left sides.
//! Each side gets one deformation mode which perturbs its points.

use super::{Path, Point};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const POINTS_PER_SIDE: usize = 10;
pub const EDGE_POINT_COUNT: usize = POINTS_PER_SIDE * 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMode {
    /// Small perpendicular noise on an otherwise straight side
    Jitter,
    /// Whole side pushed in or out to a single offset
    Stretch,
    /// Sine-shaped bow along the side
    ArcBulge,
    /// Postage-stamp teeth
    Sawtooth,
    /// Shallow inward dent around the midpoint
    BluntBend,
}

impl EdgeMode {
    pub const ALL: [EdgeMode; 5] = [
        EdgeMode::Jitter,
        EdgeMode::Stretch,
        EdgeMode::ArcBulge,
        EdgeMode::Sawtooth,
        EdgeMode::BluntBend,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Point at fraction `t` along the undeformed side, walking clockwise.
    fn base_point(self, t: f32) -> Point {
        match self {
            Side::Top => Point::new(-1. + 2. * t, -1.),
            Side::Right => Point::new(1., -1. + 2. * t),
            Side::Bottom => Point::new(1. - 2. * t, 1.),
            Side::Left => Point::new(-1., 1. - 2. * t),
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// Immutable torn outline. Points are normalised; scale them by half the
/// note's width and height to place them around the note centre.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgePolygon {
    modes: [EdgeMode; 4],
    points: Vec<Point>,
}

impl EdgePolygon {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Deformation mode per side, in `Side::ALL` order.
    pub fn modes(&self) -> [EdgeMode; 4] {
        self.modes
    }

    pub fn mode(&self, side: Side) -> EdgeMode {
        self.modes[side as usize]
    }

    pub fn scaled_points(&self, width: f32, height: f32) -> Vec<Point> {
        self.points
            .iter()
            .map(|p| p.scaled(width / 2., height / 2.))
            .collect()
    }

    /// Closed outline for a note of the given size, centred on the origin.
    pub fn to_path(&self, width: f32, height: f32) -> Path {
        Path::polygon(&self.scaled_points(width, height))
    }
}

/// Ranges for each deformation. Defaults reproduce the classic torn look.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeShapeGenerator {
    pub jitter: f32,
    pub stretch: (f32, f32),
    pub arc_height: (f32, f32),
    pub teeth_size: (f32, f32),
    pub teeth_frequency: (u32, u32),
    pub bend: (f32, f32),
}

impl Default for EdgeShapeGenerator {
    fn default() -> Self {
        Self {
            jitter: 0.1,
            stretch: (0.7, 1.3),
            arc_height: (0.1, 0.3),
            teeth_size: (0.03, 0.07),
            teeth_frequency: (6, 13),
            bend: (0.15, 0.25),
        }
    }
}

impl EdgeShapeGenerator {
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> EdgePolygon {
        let modes = self.pick_modes(rng);
        let points = (0..EDGE_POINT_COUNT)
            .map(|i| {
                let side = Side::ALL[i / POINTS_PER_SIDE];
                let t = (i % POINTS_PER_SIDE) as f32 / POINTS_PER_SIDE as f32;
                self.deform(rng, side, modes[side as usize], t)
            })
            .collect();
        EdgePolygon { modes, points }
    }

    /// Four uniform picks, then each of Stretch, ArcBulge, Sawtooth and
    /// BluntBend is forced onto a random side if missing. Later corrections
    /// may overwrite earlier ones, so only BluntBend is guaranteed.
    pub fn pick_modes<R: Rng + ?Sized>(&self, rng: &mut R) -> [EdgeMode; 4] {
        let mut modes = [EdgeMode::Jitter; 4];
        for mode in modes.iter_mut() {
            *mode = EdgeMode::ALL[rng.gen_range(0..EdgeMode::ALL.len())];
        }
        for required in &EdgeMode::ALL[1..] {
            if !modes.contains(required) {
                modes[rng.gen_range(0..4)] = *required;
            }
        }
        modes
    }

    fn deform<R: Rng + ?Sized>(&self, rng: &mut R, side: Side, mode: EdgeMode, t: f32) -> Point {
        let mut p = side.base_point(t);
        match mode {
            EdgeMode::Jitter => {
                let noise = (rng.gen::<f32>() - 0.5) * self.jitter;
                if side.is_horizontal() {
                    p.y += noise;
                } else {
                    p.x += noise;
                }
            }
            EdgeMode::Stretch => {
                let factor = rng.gen_range(self.stretch.0..self.stretch.1);
                match side {
                    Side::Top => p.y = -factor,
                    Side::Right => p.x = factor,
                    Side::Bottom => p.y = factor,
                    Side::Left => p.x = -factor,
                }
            }
            EdgeMode::ArcBulge => {
                let height = rng.gen_range(self.arc_height.0..self.arc_height.1);
                let bow = (t * std::f32::consts::PI).sin() * height;
                match side {
                    Side::Top => p.y += bow,
                    Side::Right => p.x += bow,
                    Side::Bottom => p.y += bow,
                    Side::Left => p.x -= bow,
                }
            }
            EdgeMode::Sawtooth => {
                let size = rng.gen_range(self.teeth_size.0..self.teeth_size.1);
                let frequency =
                    rng.gen_range(self.teeth_frequency.0..=self.teeth_frequency.1) as f32;
                let tooth = (t * std::f32::consts::PI * frequency).sin().abs() * size;
                match side {
                    Side::Top => p.y -= tooth,
                    Side::Right => p.x += tooth,
                    Side::Bottom => p.y += tooth,
                    Side::Left => p.x -= tooth,
                }
            }
            EdgeMode::BluntBend => {
                // Only the points strictly between 40% and 60% of the side bend
                if t > 0.4 && t < 0.6 {
                    let amount = rng.gen_range(self.bend.0..self.bend.1);
                    let falloff = (t - 0.5).abs() / 0.1;
                    let offset = amount * (1. - falloff).max(0.);
                    match side {
                        Side::Top => p.y += offset,
                        Side::Right => p.x -= offset,
                        Side::Bottom => p.y -= offset,
                        Side::Left => p.x += offset,
                    }
                }
            }
        }
        p
    }
}
