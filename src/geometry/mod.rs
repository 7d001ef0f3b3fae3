//! Plane geometry shared by the look generators and both drawing surfaces.
//!
//! Everything here works in `f32` canvas units with the y axis pointing down,
//! so a positive rotation turns clockwise on screen.

pub mod edge;
pub mod lift;
pub mod path;

pub use edge::{EdgeMode, EdgePolygon, EdgeShapeGenerator, Side, EDGE_POINT_COUNT, POINTS_PER_SIDE};
pub use lift::{LiftCurveGenerator, LiftData, LiftSelector};
pub use path::{Path, SubPath};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0., y: 0. };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, sx: f32, sy: f32) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// 2D affine transform in the canvas convention:
///
/// ```text
/// | a c e |
/// | b d f |
/// ```
///
/// Composition methods post-multiply, so `m.translate(..).rotate(..)` behaves
/// like successive `translate`/`rotate` calls on a 2D drawing context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1., b: 0., c: 0., d: 1., e: 0., f: 0. };

    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            e: self.a * dx + self.c * dy + self.e,
            f: self.b * dx + self.d * dy + self.f,
            ..self
        }
    }

    pub fn scale(self, sx: f32, sy: f32) -> Self {
        Self {
            a: self.a * sx,
            b: self.b * sx,
            c: self.c * sy,
            d: self.d * sy,
            ..self
        }
    }

    pub fn rotate(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Geometric mean of the two axis scales. Used to pick a raster size for
    /// glyphs and blur radii under a scaled transform.
    pub fn mean_scale(&self) -> f32 {
        self.determinant().abs().sqrt()
    }

    pub fn invert(&self) -> Option<Affine> {
        let det = self.determinant();
        if det == 0. || !det.is_finite() {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_translate_then_rotate_matches_context_order() {
        let m = Affine::IDENTITY
            .translate(10., 20.)
            .rotate(std::f32::consts::FRAC_PI_2);
        // A quarter turn clockwise (y down) sends +x to +y before translating
        assert!(close(m.apply(Point::new(1., 0.)), Point::new(10., 21.)));
    }

    #[test]
    fn test_invert_round_trips_points() {
        let m = Affine::IDENTITY
            .translate(3., -7.)
            .rotate(0.4)
            .scale(1.7, 0.6);
        let inv = m.invert().expect("invertible");
        let p = Point::new(12.5, -4.25);
        assert!(close(inv.apply(m.apply(p)), p));
    }

    #[test]
    fn test_zero_scale_is_not_invertible() {
        assert!(Affine::IDENTITY.scale(0., 1.).invert().is_none());
    }

    #[test]
    fn test_mean_scale() {
        let m = Affine::IDENTITY.rotate(1.1).scale(2., 2.);
        assert!((m.mean_scale() - 2.).abs() < 1e-5);
    }
}
