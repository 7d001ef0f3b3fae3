//! Full repaint of the page: backdrop, grid, then every fragment in z order.
//!
//! Each fragment is drawn in its own save/restore block: placed by its
//! transform, clipped to its torn outline, filled by its paper style, dressed
//! with light and grain overlays, then lettered. The overlays' positions come
//! from a per-pipeline rng, so the paper texture shifts a little on every
//! repaint while the outline and style stay put.

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use thiserror::Error;

use super::backdrop::draw_backdrop;
use super::background::draw_background;
use super::surface::{ColourStop, FontSpec, Paint, Shadow, Surface, TextMeasure};
use super::theme::*;
use crate::canvas::{round_half_up, Canvas, FontSize};
use crate::geometry::{Path, Point};
use crate::style::{Archetype, Rgba};
use crate::types::{Fragment, FragmentId};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Pixel buffer does not match {width}x{height}")]
    BufferSize { width: usize, height: usize },

    #[error("Image export failed: {0}")]
    Export(#[from] image::ImageError),

    #[error("Fragment {0} has a non-finite transform")]
    NonFiniteTransform(FragmentId),

    #[error("Fragment {0} measures to an empty or non-finite note")]
    DegenerateNote(FragmentId),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Font and note rectangle for one fragment at the current font size.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteLayout {
    pub font: FontSpec,
    pub text_width: f32,
    pub width: f32,
    pub height: f32,
}

pub fn note_layout<M: TextMeasure + ?Sized>(fragment: &Fragment, font_size: FontSize, measure: &mut M) -> NoteLayout {
    let style = &fragment.look().style().font;
    let size = round_half_up(font_size.base_px() * style.size_modifier);
    let font = FontSpec::from_style(style, size);
    let text_width = measure.measure_text(fragment.text(), &font);
    let text_height = size * TEXT_HEIGHT_RATIO;
    NoteLayout {
        width: text_width + NOTE_PADDING * 2.,
        height: text_height * 2. + NOTE_PADDING * 2.,
        font,
        text_width,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub drawn: usize,
    pub skipped: usize,
}

pub struct RenderPipeline {
    rng: Pcg64,
}

impl RenderPipeline {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Pcg64::from_entropy(),
        }
    }

    /// Repaint the whole page. Does nothing until the canvas has a size.
    pub fn render(&mut self, canvas: &Canvas, surface: &mut dyn Surface) -> RenderReport {
        let mut report = RenderReport::default();
        let Some((width, height)) = canvas.size() else {
            debug!("Canvas has no size yet, skipping render");
            return report;
        };

        surface.clear();
        draw_backdrop(surface, &mut self.rng, canvas.backdrop(), 0., 0., width, height);
        if canvas.show_grid() {
            draw_grid(surface, width, height);
        }

        let selected = canvas.selected_id();
        for fragment in canvas.draw_order() {
            let is_selected = selected == Some(fragment.id());
            match self.draw_fragment(surface, fragment, canvas.font_size(), is_selected) {
                Ok(()) => report.drawn += 1,
                Err(e) => {
                    warn!("Skipping fragment: {}", e);
                    report.skipped += 1;
                }
            }
        }
        report
    }

    /// Draw one fragment. Validation happens before any state is pushed, so
    /// an error leaves the surface's stack balanced.
    pub fn draw_fragment(
        &mut self,
        surface: &mut dyn Surface,
        fragment: &Fragment,
        font_size: FontSize,
        selected: bool,
    ) -> Result<()> {
        let position = fragment.position();
        let scale = fragment.scale();
        let rotation = fragment.rotation();
        if !position.is_finite() || !rotation.is_finite() || !(scale.is_finite() && scale > 0.) {
            return Err(RenderError::NonFiniteTransform(fragment.id()));
        }
        let layout = note_layout(fragment, font_size, surface);
        let (w, h) = (layout.width, layout.height);
        if !(w.is_finite() && h.is_finite() && w > 0. && h > 0.) {
            return Err(RenderError::DegenerateNote(fragment.id()));
        }
        let look = fragment.look();

        surface.save();
        surface.translate(position.x, position.y);
        surface.scale(scale, scale);
        surface.rotate(rotation.to_radians());

        surface.set_shadow(Some(NOTE_SHADOW));
        surface.save();
        surface.clip(&look.edge().to_path(w, h));
        draw_background(surface, &mut self.rng, -w / 2., -h / 2., w, h, look.style());
        surface.set_shadow(None);

        if look.archetype() != Archetype::Textured {
            surface.fill_rect(-w / 2., -h / 2., w, h, &Paint::Solid(PAPER_TINT));
            surface.fill_rect(-w / 2., -h / 2., w, h, &light_paint(look.light_angle(), w, h));
        }
        surface.stroke_path(
            &look.edge().to_path(w * INNER_EDGE_SCALE, h * INNER_EDGE_SCALE),
            &Paint::Solid(INNER_EDGE),
            INNER_EDGE_WIDTH,
        );
        self.draw_paper_grain(surface, w, h);
        surface.restore();

        // Restoring the clip brings the drop shadow back for the lettering
        if selected {
            surface.set_shadow(Some(Shadow {
                colour: SELECTION_GLOW.colour,
                blur: SELECTION_GLOW.blur,
                ..NOTE_SHADOW
            }));
        }
        surface.fill_text(fragment.text(), Point::ORIGIN, &layout.font, look.style().text.to_rgba());
        surface.set_shadow(None);

        if selected {
            surface.set_line_dash(&SELECTION_DASH);
            surface.save();
            surface.scale(SELECTION_OUTLINE_SCALE, SELECTION_OUTLINE_SCALE);
            surface.stroke_path(
                &look.edge().to_path(w, h),
                &Paint::Solid(SELECTION_OUTLINE),
                SELECTION_OUTLINE_WIDTH,
            );
            surface.restore();
            surface.set_line_dash(&[]);
        }
        surface.restore();
        Ok(())
    }

    /// Rule lines, specks, an occasional blemish and a couple of creases,
    /// all inside the current clip.
    fn draw_paper_grain(&mut self, surface: &mut dyn Surface, w: f32, h: f32) {
        let rng = &mut self.rng;

        let mut rules = Path::new();
        let mut y = -h / 2.;
        while y < h / 2. {
            rules.append(Path::rect(-w / 2., y, w, RULE_HEIGHT));
            y += RULE_SPACING;
        }
        surface.fill_path(&rules, &Paint::Solid(RULE_LINE));

        for _ in 0..GRAIN_COUNT {
            let centre = Point::new((rng.gen::<f32>() - 0.5) * w, (rng.gen::<f32>() - 0.5) * h);
            let radius = rng.gen::<f32>() * 0.8 + 0.2;
            surface.fill_path(&Path::circle(centre, radius), &Paint::Solid(GRAIN));
        }

        if rng.gen::<f64>() < BLEMISH_CHANCE {
            let at = Point::new(
                (rng.gen::<f32>() - 0.5) * (w * 0.7),
                (rng.gen::<f32>() - 0.5) * (h * 0.7),
            );
            let size = 1. + rng.gen::<f32>() * 3.;
            let mark = match rng.gen_range(0..3) {
                0 => Path::circle(at, size),
                1 => Path::rect(at.x - size / 2., at.y - size / 2., size, size),
                _ => Path::polygon(&[
                    at.offset(0., -size / 2.),
                    at.offset(size / 2., 0.),
                    at.offset(0., size / 2.),
                    at.offset(-size / 2., 0.),
                ]),
            };
            surface.fill_path(&mark, &Paint::Solid(BLEMISH));
        }

        let wrinkles = 2 + rng.gen_range(0..2);
        for _ in 0..wrinkles {
            let start_x = -w / 2. + rng.gen::<f32>() * w;
            let end_x = -w / 2. + rng.gen::<f32>() * w;
            let y = -h / 2. + rng.gen::<f32>() * h;
            let ctrl = Point::new((start_x + end_x) / 2., y + (rng.gen::<f32>() - 0.5) * 5.);

            let mut crease = Path::new();
            crease.move_to(Point::new(start_x, y));
            crease.quad_to(ctrl, Point::new(end_x, y));
            surface.stroke_path(&crease, &Paint::Solid(WRINKLE), WRINKLE_WIDTH);
        }
    }
}

/// Raking light: bright near the light, neutral midway, slightly dark far off.
fn light_paint(light_angle: f32, w: f32, h: f32) -> Paint {
    let size = w.max(h);
    let centre = Point::new(light_angle.cos() * size / 2., light_angle.sin() * size / 2.);
    Paint::radial(
        centre,
        0.,
        size,
        vec![
            ColourStop {
                offset: 0.,
                colour: LIGHT_HIGHLIGHT,
            },
            ColourStop {
                offset: 0.5,
                colour: Rgba::TRANSPARENT,
            },
            ColourStop {
                offset: 1.,
                colour: LIGHT_SHADE,
            },
        ],
    )
}

/// Alignment grid at `width / 40` spacing.
pub fn draw_grid(surface: &mut dyn Surface, width: f32, height: f32) {
    let step = width / GRID_DIVISIONS;
    if !(step.is_finite() && step > 0.) {
        return;
    }
    let mut grid = Path::new();
    let mut x = 0.;
    while x <= width {
        grid.move_to(Point::new(x, 0.));
        grid.line_to(Point::new(x, height));
        x += step;
    }
    let mut y = 0.;
    while y <= height {
        grid.move_to(Point::new(0., y));
        grid.line_to(Point::new(width, y));
        y += step;
    }
    surface.stroke_path(&grid, &Paint::Solid(GRID_LINE), GRID_LINE_WIDTH);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::types::FragmentDescriptor;
    use crate::ui::recording::{DrawOp, RecordingSurface};

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(9);
        let mut measure = |_: &str, _: &FontSpec| 40f32;
        canvas
            .apply(Command::Resize { width: 600., height: 800. }, &mut measure)
            .unwrap();
        canvas
    }

    #[test]
    fn test_no_size_no_draw() {
        let canvas = Canvas::new(1);
        let mut surface = RecordingSurface::new(100., 100.);
        let report = RenderPipeline::new(0).render(&canvas, &mut surface);
        assert_eq!(report, RenderReport::default());
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_fragments_drawn_in_z_order_and_balanced() {
        let mut canvas = canvas();
        let first = canvas.place(FragmentDescriptor::new("", "一", ""), Point::new(50., 50.)).unwrap();
        canvas.place(FragmentDescriptor::new("", "二", ""), Point::new(60., 60.)).unwrap();
        canvas.apply(Command::Select(Some(first)), &mut |_: &str, _: &FontSpec| 40f32).unwrap();

        let mut surface = RecordingSurface::new(400., 600.);
        let report = RenderPipeline::new(0).render(&canvas, &mut surface);
        assert_eq!(report.drawn, 2);
        assert_eq!(surface.texts(), vec!["二", "一"]);
        assert_eq!(surface.depth(), 0);
        assert!(surface.current_state().line_dash.is_empty());
    }

    #[test]
    fn test_bad_fragment_skipped_among_good_ones() {
        let mut canvas = canvas();
        canvas.place(FragmentDescriptor::new("", "一", ""), Point::new(50., 50.)).unwrap();
        let bad = canvas.place(FragmentDescriptor::new("", "二", ""), Point::new(150., 150.)).unwrap();
        canvas.place(FragmentDescriptor::new("", "三", ""), Point::new(250., 250.)).unwrap();
        canvas.fragment_mut(bad).unwrap().rotation = f32::INFINITY;

        let mut surface = RecordingSurface::new(400., 600.);
        let report = RenderPipeline::new(0).render(&canvas, &mut surface);
        assert_eq!(report, RenderReport { drawn: 2, skipped: 1 });
        assert_eq!(surface.texts(), vec!["一", "三"]);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_selected_gets_glow_and_dashed_outline() {
        let mut canvas = canvas();
        canvas.place(FragmentDescriptor::new("", "月", ""), Point::new(50., 50.)).unwrap();
        let mut surface = RecordingSurface::new(400., 600.);
        RenderPipeline::new(0).render(&canvas, &mut surface);

        let text_shadow = surface.ops().iter().find_map(|op| match op {
            DrawOp::FillText { shadow, .. } => Some(*shadow),
            _ => None,
        });
        assert_eq!(text_shadow.flatten().map(|s| s.blur), Some(SELECTION_GLOW.blur));
        assert!(surface.ops().iter().any(|op| matches!(
            op,
            DrawOp::StrokePath { dash, line_width, .. } if dash == &SELECTION_DASH.to_vec() && *line_width == 2.
        )));
    }

    #[test]
    fn test_unselected_text_keeps_drop_shadow() {
        let mut canvas = canvas();
        canvas.place(FragmentDescriptor::new("", "月", ""), Point::new(50., 50.)).unwrap();
        canvas.apply(Command::Select(None), &mut |_: &str, _: &FontSpec| 40f32).unwrap();
        let mut surface = RecordingSurface::new(400., 600.);
        RenderPipeline::new(0).render(&canvas, &mut surface);
        let shadow = surface.ops().iter().find_map(|op| match op {
            DrawOp::FillText { shadow, .. } => Some(*shadow),
            _ => None,
        });
        assert_eq!(shadow, Some(Some(NOTE_SHADOW)));
    }

    #[test]
    fn test_clip_precedes_background() {
        let mut canvas = canvas();
        canvas.place(FragmentDescriptor::new("", "花", ""), Point::new(50., 50.)).unwrap();
        let mut surface = RecordingSurface::new(400., 600.);
        RenderPipeline::new(0).render(&canvas, &mut surface);
        let clip = surface.ops().iter().position(|op| matches!(op, DrawOp::Clip(_)));
        let fill = surface.ops().iter().position(|op| matches!(op, DrawOp::FillPath { .. }));
        assert!(clip.unwrap() < fill.unwrap());
    }

    #[test]
    fn test_grid_only_when_enabled() {
        let mut canvas = canvas();
        let mut surface = RecordingSurface::new(400., 600.);
        RenderPipeline::new(0).render(&canvas, &mut surface);
        assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::StrokePath { .. })));

        canvas.apply(Command::SetGrid(true), &mut |_: &str, _: &FontSpec| 40f32).unwrap();
        let mut surface = RecordingSurface::new(400., 600.);
        RenderPipeline::new(0).render(&canvas, &mut surface);
        assert!(surface.ops().iter().any(|op| matches!(
            op,
            DrawOp::StrokePath { line_width, .. } if *line_width == GRID_LINE_WIDTH
        )));
    }

    #[test]
    fn test_non_finite_fragment_rejected_before_save() {
        use crate::types::{LookFactory, LookSeed};
        let fragment = Fragment::new(
            FragmentId::new(1),
            FragmentDescriptor::new("", "坏", ""),
            Point::new(f32::NAN, 0.),
            0.,
            1,
            LookFactory::default().look_for(LookSeed::from_u64(1)),
        );
        let mut surface = RecordingSurface::new(100., 100.);
        let result = RenderPipeline::new(0).draw_fragment(&mut surface, &fragment, FontSize::Small, false);
        assert!(matches!(result, Err(RenderError::NonFiniteTransform(_))));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_note_layout_dimensions() {
        let mut canvas = canvas();
        let id = canvas.place(FragmentDescriptor::new("", "明月", ""), Point::ORIGIN).unwrap();
        let fragment = canvas.fragment(id).unwrap();
        let mut measure = |_: &str, _: &FontSpec| 40f32;
        let layout = note_layout(fragment, FontSize::Small, &mut measure);
        let size = layout.font.size;
        assert!((15. ..=21.).contains(&size));
        assert_eq!(layout.width, 70.);
        assert!((layout.height - (size * 0.8 * 2. + 30.)).abs() < 1e-4);
    }
}
