//! Surface that records draw calls instead of rasterizing them.
//!
//! Lets tests assert on draw order and state without comparing pixels.

use super::surface::{DrawState, FixedAdvance, FontSpec, Paint, Shadow, StateStack, Surface, TextMeasure};
use crate::geometry::{Path, Point};
use crate::style::Rgba;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Save,
    Restore,
    Translate(f32, f32),
    Scale(f32, f32),
    Rotate(f32),
    Shadow(Option<Shadow>),
    LineDash(Vec<f32>),
    Clip(Path),
    FillPath {
        path: Path,
        paint: Paint,
    },
    StrokePath {
        path: Path,
        paint: Paint,
        line_width: f32,
        dash: Vec<f32>,
    },
    FillText {
        text: String,
        at: Point,
        font: FontSpec,
        colour: Rgba,
        shadow: Option<Shadow>,
    },
}

#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    ops: Vec<DrawOp>,
    state: StateStack<()>,
    measure: FixedAdvance,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            state: StateStack::default(),
            measure: FixedAdvance::default(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Text runs in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Current save depth; zero after a balanced render.
    pub fn depth(&self) -> usize {
        self.state.depth()
    }

    pub fn current_state(&self) -> &DrawState<()> {
        &self.state.current
    }
}

impl TextMeasure for RecordingSurface {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f32 {
        self.measure.measure_text(text, font)
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.state.reset();
        self.ops.push(DrawOp::Clear);
    }

    fn save(&mut self) {
        self.state.save();
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.state.restore();
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.current.transform = self.state.current.transform.translate(dx, dy);
        self.ops.push(DrawOp::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.current.transform = self.state.current.transform.scale(sx, sy);
        self.ops.push(DrawOp::Scale(sx, sy));
    }

    fn rotate(&mut self, radians: f32) {
        self.state.current.transform = self.state.current.transform.rotate(radians);
        self.ops.push(DrawOp::Rotate(radians));
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.current.shadow = shadow;
        self.ops.push(DrawOp::Shadow(shadow));
    }

    fn set_line_dash(&mut self, dash: &[f32]) {
        self.state.current.line_dash = dash.to_vec();
        self.ops.push(DrawOp::LineDash(dash.to_vec()));
    }

    fn clip(&mut self, path: &Path) {
        self.ops.push(DrawOp::Clip(path.clone()));
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.ops.push(DrawOp::FillPath {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint, line_width: f32) {
        self.ops.push(DrawOp::StrokePath {
            path: path.clone(),
            paint: paint.clone(),
            line_width,
            dash: self.state.current.line_dash.clone(),
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &FontSpec, colour: Rgba) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            at,
            font: font.clone(),
            colour,
            shadow: self.state.current.shadow,
        });
    }
}
