//! Procedural paper fills for a note rectangle.
//!
//! Archetype parameters come from the fragment's style and never change;
//! speckle, fibre and stain positions are drawn from the caller's rng, so
//! the texture shifts slightly on every repaint.

use log::debug;
use rand::Rng;
use std::f32::consts::TAU;

use super::surface::{Paint, Surface};
use crate::geometry::{Path, Point};
use crate::style::{Background, Colour, Hsl, StyleDescriptor};

/// Fill `(x, y, width, height)` with the style's background archetype.
pub fn draw_background<R: Rng + ?Sized>(
    surface: &mut dyn Surface,
    rng: &mut R,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    style: &StyleDescriptor,
) {
    match &style.background {
        Background::Solid { colour } => {
            surface.fill_rect(x, y, width, height, &Paint::Solid(colour.to_rgba()));
        }
        Background::Gradient { from, to, angle_deg } => {
            let angle = (*angle_deg as f32).to_radians();
            let paint = Paint::linear(
                Point::new(x, y),
                Point::new(x + width * angle.cos(), y + height * angle.sin()),
                from.to_rgba(),
                to.to_rgba(),
            );
            surface.fill_rect(x, y, width, height, &paint);
        }
        Background::Textured {
            base,
            spot_density,
            spot_contrast,
        } => {
            surface.fill_rect(x, y, width, height, &Paint::Solid(base.to_rgba()));
            match base.decompose() {
                Ok(hsl) => draw_spots(surface, rng, x, y, width, height, hsl, *spot_density, *spot_contrast),
                Err(e) => debug!("Skipping speckles: {}", e),
            }
        }
        Background::Parchment {
            base,
            fiber_count,
            fiber_intensity,
            age_spots,
            age_factor,
        } => {
            surface.fill_rect(x, y, width, height, &Paint::Solid(base.to_rgba()));
            let hsl = match base.decompose() {
                Ok(hsl) => hsl,
                Err(e) => {
                    debug!("Skipping parchment layers: {}", e);
                    return;
                }
            };
            draw_fibres(surface, rng, x, y, width, height, hsl, *fiber_count, *fiber_intensity);
            draw_age_spots(surface, rng, x, y, width, height, hsl, *age_spots, *age_factor);
            draw_vignettes(surface, x, y, width, height, hsl);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_spots<R: Rng + ?Sized>(
    surface: &mut dyn Surface,
    rng: &mut R,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    hsl: Hsl,
    density: u32,
    contrast: f32,
) {
    if density == 0 {
        return;
    }
    let spot_size = width.max(height) / density as f32;
    if !(spot_size > 0.) {
        return;
    }
    let count = (width * height / (spot_size * spot_size) * 2.).floor() as usize;
    for _ in 0..count {
        let centre = Point::new(x + rng.gen::<f32>() * width, y + rng.gen::<f32>() * height);
        let radius = rng.gen::<f32>() * spot_size / 2.;
        let lightness = hsl.l * (1. + (rng.gen::<f32>() - 0.5) * contrast);
        let colour = Colour::hsl(hsl.h, hsl.s, lightness);
        surface.fill_path(&Path::circle(centre, radius), &Paint::Solid(colour.to_rgba()));
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_fibres<R: Rng + ?Sized>(
    surface: &mut dyn Surface,
    rng: &mut R,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    hsl: Hsl,
    count: u32,
    intensity: f32,
) {
    for _ in 0..count {
        let start = Point::new(x + rng.gen::<f32>() * width, y + rng.gen::<f32>() * height);
        let length = 2. + rng.gen::<f32>() * 6.;
        let angle = rng.gen::<f32>() * TAU;
        let lightness = (hsl.l + (rng.gen::<f32>() - 0.5) * 10.).clamp(0., 100.);

        let mut fibre = Path::new();
        fibre.move_to(start);
        fibre.line_to(start.offset(angle.cos() * length, angle.sin() * length));
        let colour = Colour::hsla(hsl.h, hsl.s, lightness, intensity);
        surface.stroke_path(&fibre, &Paint::Solid(colour.to_rgba()), 0.5);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_age_spots<R: Rng + ?Sized>(
    surface: &mut dyn Surface,
    rng: &mut R,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    hsl: Hsl,
    count: u32,
    age_factor: f32,
) {
    for _ in 0..count {
        let centre = Point::new(x + rng.gen::<f32>() * width, y + rng.gen::<f32>() * height);
        let radius = 1. + rng.gen::<f32>() * 3.;
        let hue = 30. + rng.gen::<f32>() * 20.;
        let saturation = 20. + rng.gen::<f32>() * 30.;
        let lightness = hsl.l - 10. - rng.gen::<f32>() * 15.;
        let colour = Colour::hsla(hue, saturation, lightness, age_factor);
        surface.fill_path(&Path::circle(centre, radius), &Paint::Solid(colour.to_rgba()));
    }
}

/// Darkened bands fading inward from each edge.
fn draw_vignettes(surface: &mut dyn Surface, x: f32, y: f32, width: f32, height: f32, hsl: Hsl) {
    let edge = width.min(height) * 0.15;
    let dark = Colour::hsla(hsl.h - 5., hsl.s + 5., hsl.l - 10., 0.1).to_rgba();
    let clear = Colour::hsla(hsl.h, hsl.s, hsl.l, 0.).to_rgba();

    // (gradient from, gradient to, rect) with the dark stop at `from`
    let bands = [
        (Point::new(x, y), Point::new(x, y + edge), (x, y, width, edge)),
        (
            Point::new(x + width, y),
            Point::new(x + width - edge, y),
            (x + width - edge, y, edge, height),
        ),
        (
            Point::new(x, y + height),
            Point::new(x, y + height - edge),
            (x, y + height - edge, width, edge),
        ),
        (Point::new(x, y), Point::new(x + edge, y), (x, y, edge, height)),
    ];
    for (from, to, (rx, ry, rw, rh)) in bands {
        surface.fill_rect(rx, ry, rw, rh, &Paint::linear(from, to, dark, clear));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{FontStyle, FontWeight, Rgba};
    use crate::ui::recording::{DrawOp, RecordingSurface};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn style(background: Background) -> StyleDescriptor {
        StyleDescriptor {
            background,
            text: Colour::hsl(0., 0., 10.),
            font: FontStyle {
                family: "serif".into(),
                weight: FontWeight::Normal,
                italic: false,
                size_modifier: 1.,
            },
        }
    }

    fn fills(ops: &[DrawOp]) -> usize {
        ops.iter()
            .filter(|op| matches!(op, DrawOp::FillPath { .. }))
            .count()
    }

    #[test]
    fn test_solid_is_single_fill() {
        let mut surface = RecordingSurface::new(100., 100.);
        let mut rng = Pcg64::seed_from_u64(1);
        let style = style(Background::Solid {
            colour: Colour::hsl(40., 30., 90.),
        });
        draw_background(&mut surface, &mut rng, -20., -10., 40., 20., &style);
        assert_eq!(surface.ops().len(), 1);
    }

    #[test]
    fn test_gradient_direction_follows_angle() {
        let mut surface = RecordingSurface::new(100., 100.);
        let mut rng = Pcg64::seed_from_u64(1);
        let style = style(Background::Gradient {
            from: Colour::hsl(0., 50., 50.),
            to: Colour::hsl(200., 50., 50.),
            angle_deg: 90,
        });
        draw_background(&mut surface, &mut rng, 0., 0., 40., 20., &style);
        match &surface.ops()[0] {
            DrawOp::FillPath {
                paint: Paint::Linear { from, to, .. },
                ..
            } => {
                assert_eq!(*from, Point::ORIGIN);
                assert!(to.x.abs() < 1e-4);
                assert!((to.y - 20.).abs() < 1e-4);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_textured_spot_count() {
        let mut surface = RecordingSurface::new(100., 100.);
        let mut rng = Pcg64::seed_from_u64(2);
        let style = style(Background::Textured {
            base: Colour::hsl(40., 30., 80.),
            spot_density: 10,
            spot_contrast: 0.1,
        });
        draw_background(&mut surface, &mut rng, 0., 0., 100., 50., &style);
        // spotSize 10 => floor(5000 / 100 * 2) = 100 spots plus the base
        assert_eq!(fills(surface.ops()), 101);
    }

    #[test]
    fn test_textured_hex_base_keeps_fill_only() {
        let mut surface = RecordingSurface::new(100., 100.);
        let mut rng = Pcg64::seed_from_u64(2);
        let style = style(Background::Textured {
            base: Colour::Rgb(Rgba::opaque(200, 190, 180)),
            spot_density: 10,
            spot_contrast: 0.1,
        });
        draw_background(&mut surface, &mut rng, 0., 0., 100., 50., &style);
        assert_eq!(surface.ops().len(), 1);
    }

    #[test]
    fn test_parchment_layers() {
        let mut surface = RecordingSurface::new(100., 100.);
        let mut rng = Pcg64::seed_from_u64(3);
        let style = style(Background::Parchment {
            base: Colour::hsl(40., 40., 85.),
            fiber_count: 80,
            fiber_intensity: 0.04,
            age_spots: 12,
            age_factor: 0.2,
        });
        draw_background(&mut surface, &mut rng, 0., 0., 60., 40., &style);
        let strokes = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::StrokePath { .. }))
            .count();
        assert_eq!(strokes, 80);
        // base + spots + four vignettes
        assert_eq!(fills(surface.ops()), 1 + 12 + 4);
    }

    #[test]
    fn test_parchment_hex_base_keeps_fill_only() {
        let mut surface = RecordingSurface::new(100., 100.);
        let mut rng = Pcg64::seed_from_u64(3);
        let style = style(Background::Parchment {
            base: Colour::Rgb(Rgba::opaque(240, 230, 200)),
            fiber_count: 80,
            fiber_intensity: 0.04,
            age_spots: 12,
            age_factor: 0.2,
        });
        draw_background(&mut surface, &mut rng, 0., 0., 60., 40., &style);
        assert_eq!(surface.ops().len(), 1);
        assert!(matches!(surface.ops()[0], DrawOp::FillPath { .. }));
    }
}
