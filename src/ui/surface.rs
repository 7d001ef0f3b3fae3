//! Immediate-mode 2D drawing contract.
//!
//! Mirrors the subset of a canvas context the render pipeline needs: a
//! save/restore stack of transform, shadow, line dash and clip, plus path
//! fills and strokes, gradients and centred text.

use crate::geometry::{Affine, Path, Point};
use crate::style::{FontStyle, Rgba};

#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    pub weight: u16,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            weight: 400,
            italic: false,
        }
    }

    pub fn from_style(style: &FontStyle, size: f32) -> Self {
        Self {
            family: style.family.clone(),
            size,
            weight: style.weight.value(),
            italic: style.italic,
        }
    }
}

/// Horizontal advance of a run of text.
pub trait TextMeasure {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f32;
}

impl<F: FnMut(&str, &FontSpec) -> f32> TextMeasure for F {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f32 {
        self(text, font)
    }
}

/// Measurer that assumes every character advances by a fixed fraction of
/// the font size. Used where no font system is loaded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub em: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        // CJK glyphs are roughly square
        Self { em: 1. }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * self.em
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub colour: Rgba,
    pub blur: f32,
    /// Device-space offsets; not affected by the current transform
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Shadow {
    pub fn glow(colour: Rgba, blur: f32) -> Self {
        Self {
            colour,
            blur,
            offset_x: 0.,
            offset_y: 0.,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColourStop {
    pub offset: f32,
    pub colour: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear {
        from: Point,
        to: Point,
        stops: Vec<ColourStop>,
    },
    Radial {
        centre: Point,
        inner_radius: f32,
        outer_radius: f32,
        stops: Vec<ColourStop>,
    },
}

impl Paint {
    pub fn linear(from: Point, to: Point, start: Rgba, end: Rgba) -> Self {
        Paint::Linear {
            from,
            to,
            stops: vec![
                ColourStop {
                    offset: 0.,
                    colour: start,
                },
                ColourStop {
                    offset: 1.,
                    colour: end,
                },
            ],
        }
    }

    pub fn radial(centre: Point, inner_radius: f32, outer_radius: f32, stops: Vec<ColourStop>) -> Self {
        Paint::Radial {
            centre,
            inner_radius,
            outer_radius,
            stops,
        }
    }

    /// Colour at a point in the paint's own (user) space.
    pub fn colour_at(&self, p: Point) -> Rgba {
        match self {
            Paint::Solid(colour) => *colour,
            Paint::Linear { from, to, stops } => {
                let (dx, dy) = (to.x - from.x, to.y - from.y);
                let len_sq = dx * dx + dy * dy;
                let t = if len_sq > 0. {
                    ((p.x - from.x) * dx + (p.y - from.y) * dy) / len_sq
                } else {
                    0.
                };
                sample_stops(stops, t)
            }
            Paint::Radial {
                centre,
                inner_radius,
                outer_radius,
                stops,
            } => {
                let span = outer_radius - inner_radius;
                let t = if span > 0. {
                    (p.distance(*centre) - inner_radius) / span
                } else {
                    1.
                };
                sample_stops(stops, t)
            }
        }
    }

    /// Mean stop alpha, used to weight a shadow cast by this paint.
    pub fn mean_alpha(&self) -> f32 {
        match self {
            Paint::Solid(colour) => colour.a,
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => {
                if stops.is_empty() {
                    0.
                } else {
                    stops.iter().map(|s| s.colour.a).sum::<f32>() / stops.len() as f32
                }
            }
        }
    }
}

impl From<Rgba> for Paint {
    fn from(colour: Rgba) -> Self {
        Paint::Solid(colour)
    }
}

fn sample_stops(stops: &[ColourStop], t: f32) -> Rgba {
    let t = t.clamp(0., 1.);
    let Some(first) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.colour;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0. { (t - a.offset) / span } else { 1. };
            return a.colour.lerp(b.colour, local);
        }
    }
    stops.last().map(|s| s.colour).unwrap_or(first.colour)
}

/// Per-level drawing state. `C` is the surface's clip representation.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState<C> {
    pub transform: Affine,
    pub shadow: Option<Shadow>,
    pub line_dash: Vec<f32>,
    pub clip: C,
}

impl<C: Default> Default for DrawState<C> {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            shadow: None,
            line_dash: Vec::new(),
            clip: C::default(),
        }
    }
}

/// Save/restore stack shared by the surface implementations.
#[derive(Clone, Debug, Default)]
pub struct StateStack<C> {
    pub current: DrawState<C>,
    saved: Vec<DrawState<C>>,
}

impl<C: Clone + Default> StateStack<C> {
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Unbalanced restores are ignored, as on a canvas context.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn reset(&mut self) {
        self.saved.clear();
        self.current = DrawState::default();
    }
}

pub trait Surface: TextMeasure {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Transparent pixels, identity transform, empty state stack.
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    fn rotate(&mut self, radians: f32);
    fn set_shadow(&mut self, shadow: Option<Shadow>);
    fn set_line_dash(&mut self, dash: &[f32]);

    /// Intersect the clip region with `path` under the current transform.
    fn clip(&mut self, path: &Path);

    fn fill_path(&mut self, path: &Path, paint: &Paint);
    fn stroke_path(&mut self, path: &Path, paint: &Paint, line_width: f32);

    /// Draw text centred horizontally and vertically on `at`.
    fn fill_text(&mut self, text: &str, at: Point, font: &FontSpec, colour: Rgba);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: &Paint) {
        self.fill_path(&Path::rect(x, y, width, height), paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_paint_endpoints() {
        let paint = Paint::linear(
            Point::new(0., 0.),
            Point::new(10., 0.),
            Rgba::opaque(255, 0, 0),
            Rgba::opaque(0, 0, 255),
        );
        assert_eq!(paint.colour_at(Point::new(-5., 3.)), Rgba::opaque(255, 0, 0));
        assert_eq!(paint.colour_at(Point::new(20., 0.)), Rgba::opaque(0, 0, 255));
        let mid = paint.colour_at(Point::new(5., 0.));
        assert_eq!((mid.r, mid.b), (128, 128));
    }

    #[test]
    fn test_radial_paint_fades_outwards() {
        let paint = Paint::radial(
            Point::ORIGIN,
            0.,
            10.,
            vec![
                ColourStop {
                    offset: 0.,
                    colour: Rgba::new(255, 255, 255, 0.1),
                },
                ColourStop {
                    offset: 1.,
                    colour: Rgba::new(0, 0, 0, 0.),
                },
            ],
        );
        assert!(paint.colour_at(Point::ORIGIN).a > paint.colour_at(Point::new(5., 0.)).a);
        assert_eq!(paint.colour_at(Point::new(50., 0.)).a, 0.);
    }

    #[test]
    fn test_state_stack_ignores_extra_restore() {
        let mut stack: StateStack<()> = StateStack::default();
        stack.current.transform = Affine::IDENTITY.translate(5., 5.);
        stack.save();
        stack.current.transform = Affine::IDENTITY;
        stack.restore();
        stack.restore();
        assert_eq!(stack.current.transform, Affine::IDENTITY.translate(5., 5.));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_closure_measures_text() {
        let mut measure = |_: &str, _: &FontSpec| 40f32;
        assert_eq!(measure.measure_text("明月", &FontSpec::new("serif", 18.)), 40.);
        assert_eq!(FixedAdvance::default().measure_text("明月", &FontSpec::new("serif", 18.)), 36.);
    }
}
