//! Polyline path builder.
//!
//! Curves are flattened as they are added, so a [`Path`] is always a list of
//! polylines. Both the pixel rasterizer and the recording surface consume
//! that form directly.

use super::{Affine, Point};

const QUAD_SEGMENTS: usize = 12;
const CUBIC_SEGMENTS: usize = 16;
const CIRCLE_SEGMENTS: usize = 24;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubPath {
    pub points: Vec<Point>,
    pub closed: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        let mut path = Self::new();
        path.move_to(Point::new(x, y));
        path.line_to(Point::new(x + w, y));
        path.line_to(Point::new(x + w, y + h));
        path.line_to(Point::new(x, y + h));
        path.close();
        path
    }

    pub fn circle(centre: Point, radius: f32) -> Self {
        let mut path = Self::new();
        for i in 0..CIRCLE_SEGMENTS {
            let theta = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            let p = Point::new(
                centre.x + radius * theta.cos(),
                centre.y + radius * theta.sin(),
            );
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path.close();
        path
    }

    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
            path.close();
        }
        path
    }

    pub fn move_to(&mut self, p: Point) {
        self.subpaths.push(SubPath {
            points: vec![p],
            closed: false,
        });
    }

    pub fn line_to(&mut self, p: Point) {
        match self.subpaths.last_mut() {
            Some(sub) if !sub.closed => sub.points.push(p),
            _ => self.move_to(p),
        }
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) {
        let Some(from) = self.current_point() else {
            self.move_to(to);
            return;
        };
        for i in 1..=QUAD_SEGMENTS {
            let t = i as f32 / QUAD_SEGMENTS as f32;
            let mt = 1. - t;
            self.line_to(Point::new(
                mt * mt * from.x + 2. * mt * t * ctrl.x + t * t * to.x,
                mt * mt * from.y + 2. * mt * t * ctrl.y + t * t * to.y,
            ));
        }
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) {
        let Some(from) = self.current_point() else {
            self.move_to(to);
            return;
        };
        for i in 1..=CUBIC_SEGMENTS {
            let t = i as f32 / CUBIC_SEGMENTS as f32;
            let mt = 1. - t;
            let (w0, w1, w2, w3) = (mt * mt * mt, 3. * mt * mt * t, 3. * mt * t * t, t * t * t);
            self.line_to(Point::new(
                w0 * from.x + w1 * c1.x + w2 * c2.x + w3 * to.x,
                w0 * from.y + w1 * c1.y + w2 * c2.y + w3 * to.y,
            ));
        }
    }

    pub fn close(&mut self) {
        if let Some(sub) = self.subpaths.last_mut() {
            sub.closed = true;
        }
    }

    /// Add `other`'s subpaths after this path's own.
    pub fn append(&mut self, other: Path) {
        self.subpaths.extend(other.subpaths);
    }

    fn current_point(&self) -> Option<Point> {
        self.subpaths
            .last()
            .filter(|sub| !sub.closed)
            .and_then(|sub| sub.points.last().copied())
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|sub| sub.points.is_empty())
    }

    pub fn transformed(&self, m: &Affine) -> Path {
        Path {
            subpaths: self
                .subpaths
                .iter()
                .map(|sub| SubPath {
                    points: sub.points.iter().map(|p| m.apply(*p)).collect(),
                    closed: sub.closed,
                })
                .collect(),
        }
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty path.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.subpaths.iter().flat_map(|sub| sub.points.iter());
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}
